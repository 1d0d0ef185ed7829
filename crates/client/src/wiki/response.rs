//! MediaWiki Action API response types (`formatversion=2`).

use serde::Deserialize;

/// Envelope shared by every `action=query` response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<Q> {
    #[serde(default)]
    pub query: Option<Q>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

/// `query` body for `titles=` and `generator=` requests.
#[derive(Debug, Default, Deserialize)]
pub struct PagesQuery {
    #[serde(default)]
    pub pages: Vec<RawPage>,
}

/// A page entry as returned by the API.
#[derive(Debug, Default, Deserialize)]
pub struct RawPage {
    pub title: String,
    #[serde(default)]
    pub missing: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub fullurl: Option<String>,
    #[serde(default)]
    pub pageprops: Option<PageProps>,
    #[serde(default)]
    pub links: Vec<LinkRef>,
    #[serde(default)]
    pub imageinfo: Vec<ImageInfo>,
    #[serde(default)]
    pub revisions: Vec<Revision>,
}

impl RawPage {
    /// Whether the page exists and can be read.
    pub fn exists(&self) -> bool {
        !self.missing && !self.invalid
    }

    /// Wikitext of the first returned revision's main slot.
    pub fn wikitext(&self) -> Option<&str> {
        self.revisions.first().map(|rev| rev.slots.main.content.as_str())
    }

    pub fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|p| p.disambiguation.is_some())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageProps {
    /// Present (as an empty string) on disambiguation pages.
    #[serde(default)]
    pub disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct LinkRef {
    pub title: String,
}

/// `prop=revisions&rvslots=main` entry.
#[derive(Debug, Default, Deserialize)]
pub struct Revision {
    #[serde(default)]
    pub slots: Slots,
}

#[derive(Debug, Default, Deserialize)]
pub struct Slots {
    #[serde(default)]
    pub main: SlotContent,
}

#[derive(Debug, Default, Deserialize)]
pub struct SlotContent {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageInfo {
    pub url: String,
}

/// `query` body for `list=search` requests.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Vec<SearchHit>,
    #[serde(default)]
    pub searchinfo: Option<SearchInfo>,
}

impl SearchQuery {
    /// Best replacement title: the spelling suggestion if any, else the top hit.
    pub fn best_title(self) -> Option<String> {
        self.searchinfo
            .and_then(|info| info.suggestion)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.search.into_iter().next().map(|hit| hit.title))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchInfo {
    #[serde(default)]
    pub suggestion: Option<String>,
}
