//! MediaWiki Action API client.
//!
//! Answers a single-edition lookup with at most five requests:
//!
//! - **Page**: `prop=extracts|info|pageprops` on the topic, following redirects.
//! - **Suggestion**: when the title is missing, `list=search&srlimit=1` proposes
//!   a replacement title which is fetched once.
//! - **Disambiguation**: pages carrying the `disambiguation` page prop are
//!   answered with the first link of each bullet in their wikitext, falling
//!   back to `prop=links` (alphabetical) when no bullet carries a link.
//! - **Images**: `generator=images` with `prop=imageinfo` for file URLs.
//!
//! Each edition lives at the endpoint built from the configured template by
//! replacing `{lang}` with the edition code.

pub mod disambig;
pub mod error;
pub mod extract;
pub mod response;

pub use error::WikiError;
pub use extract::split_extract;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use url::Url;
use wikibot_core::config::is_valid_lang;
use wikibot_core::{AppConfig, KbFault, KnowledgeBase, Lookup, Page};

use response::{ApiResponse, PagesQuery, RawPage, SearchQuery};

/// Default endpoint template.
const DEFAULT_API_URL: &str = "https://{lang}.wikipedia.org/w/api.php";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "wikibot/0.1";

/// MediaWiki client configuration.
#[derive(Debug, Clone)]
pub struct WikiConfig {
    /// Endpoint template containing `{lang}`.
    pub api_url: String,
    /// Per-request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string; Wikimedia rejects anonymous clients.
    pub user_agent: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for WikiConfig {
    fn from(config: &AppConfig) -> Self {
        Self { api_url: config.wiki_api_url.clone(), timeout: config.timeout(), user_agent: config.user_agent.clone() }
    }
}

/// MediaWiki API client.
#[derive(Debug, Clone)]
pub struct WikiClient {
    http: reqwest::Client,
    config: WikiConfig,
}

impl WikiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: WikiConfig) -> Result<Self, WikiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| WikiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// API endpoint for an edition.
    pub fn endpoint(&self, lang: &str) -> Result<Url, WikiError> {
        if !is_valid_lang(lang) {
            return Err(WikiError::InvalidLanguage(lang.to_string()));
        }
        let raw = self.config.api_url.replace("{lang}", lang);
        Url::parse(&raw).map_err(|e| WikiError::Parse(format!("endpoint {raw}: {e}")))
    }

    /// Run one `action=query` request and unwrap the response envelope.
    async fn query<Q>(&self, endpoint: &Url, params: &[(&str, &str)]) -> Result<Q, WikiError>
    where
        Q: DeserializeOwned + Default,
    {
        let start = Instant::now();

        let http_response = self
            .http
            .get(endpoint.clone())
            .header(header::ACCEPT, "application/json")
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%endpoint, %status, elapsed = ?start.elapsed(), "MediaWiki response");

        if !status.is_success() {
            return Err(WikiError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let envelope: ApiResponse<Q> = serde_json::from_slice(&bytes).map_err(|e| WikiError::Parse(e.to_string()))?;

        if let Some(error) = envelope.error {
            return Err(WikiError::Api { code: error.code, info: error.info });
        }

        Ok(envelope.query.unwrap_or_default())
    }

    /// Fetch the page for `title`, following redirects.
    ///
    /// Returns `None` when the title does not name an existing page.
    pub async fn fetch_page(&self, endpoint: &Url, title: &str) -> Result<Option<RawPage>, WikiError> {
        let query: PagesQuery = self
            .query(
                endpoint,
                &[
                    ("prop", "extracts|info|pageprops"),
                    ("redirects", "1"),
                    ("explaintext", "1"),
                    ("exsectionformat", "wiki"),
                    ("inprop", "url"),
                    ("ppprop", "disambiguation"),
                    ("titles", title),
                ],
            )
            .await?;

        Ok(query.pages.into_iter().next().filter(RawPage::exists))
    }

    /// Ask the search backend for a better title.
    pub async fn suggest_title(&self, endpoint: &Url, topic: &str) -> Result<Option<String>, WikiError> {
        let query: SearchQuery = self
            .query(endpoint, &[("list", "search"), ("srsearch", topic), ("srlimit", "1"), ("srinfo", "suggestion")])
            .await?;

        Ok(query.best_title())
    }

    /// Candidate titles of a disambiguation page, in page order.
    pub async fn disambiguation_options(&self, endpoint: &Url, title: &str) -> Result<Vec<String>, WikiError> {
        let query: PagesQuery = self
            .query(
                endpoint,
                &[("prop", "revisions"), ("rvprop", "content"), ("rvslots", "main"), ("titles", title)],
            )
            .await?;

        let entries = query
            .pages
            .first()
            .and_then(RawPage::wikitext)
            .map(disambig::list_entries)
            .unwrap_or_default();
        if !entries.is_empty() {
            return Ok(entries);
        }

        tracing::debug!(title, "no bullet links in wikitext, using page links");
        self.linked_titles(endpoint, title).await
    }

    /// Main-namespace titles linked from a page, as the API sorts them.
    async fn linked_titles(&self, endpoint: &Url, title: &str) -> Result<Vec<String>, WikiError> {
        let query: PagesQuery = self
            .query(endpoint, &[("prop", "links"), ("plnamespace", "0"), ("pllimit", "max"), ("titles", title)])
            .await?;

        Ok(query
            .pages
            .into_iter()
            .flat_map(|page| page.links)
            .map(|link| link.title)
            .collect())
    }

    /// File URLs of the images used on a page.
    pub async fn image_urls(&self, endpoint: &Url, title: &str) -> Result<Vec<String>, WikiError> {
        let query: PagesQuery = self
            .query(
                endpoint,
                &[("generator", "images"), ("gimlimit", "max"), ("prop", "imageinfo"), ("iiprop", "url"), ("titles", title)],
            )
            .await?;

        Ok(query
            .pages
            .into_iter()
            .flat_map(|page| page.imageinfo)
            .map(|info| info.url)
            .collect())
    }

    /// Look up `topic` in one edition.
    pub async fn lookup_page(&self, topic: &str, lang: &str) -> Result<Lookup, WikiError> {
        let endpoint = self.endpoint(lang)?;

        let page = match self.fetch_page(&endpoint, topic).await? {
            Some(page) => page,
            None => {
                let Some(suggested) = self.suggest_title(&endpoint, topic).await? else {
                    tracing::debug!(topic, lang, "no page and no suggestion");
                    return Ok(Lookup::NotFound);
                };
                if suggested.eq_ignore_ascii_case(topic) {
                    return Ok(Lookup::NotFound);
                }
                tracing::debug!(topic, lang, suggested = %suggested, "retrying with suggested title");
                match self.fetch_page(&endpoint, &suggested).await? {
                    Some(page) => page,
                    None => return Ok(Lookup::NotFound),
                }
            }
        };

        if page.is_disambiguation() {
            let options = self.disambiguation_options(&endpoint, &page.title).await?;
            tracing::debug!(title = %page.title, lang, options = options.len(), "disambiguation page");
            return Ok(Lookup::Disambiguation(options));
        }

        let images = self.image_urls(&endpoint, &page.title).await?;
        let (summary, sections) = split_extract(page.extract.as_deref().unwrap_or_default());

        Ok(Lookup::Page(Page { title: page.title, summary, sections, url: page.fullurl.unwrap_or_default(), images }))
    }
}

#[async_trait]
impl KnowledgeBase for WikiClient {
    async fn lookup(&self, topic: &str, lang: &str) -> Result<Lookup, KbFault> {
        self.lookup_page(topic, lang).await.map_err(KbFault::from)
    }
}
