//! Knowledge-base capability consumed by the resolver.
//!
//! The resolver only sees this trait; the HTTP client that talks to a real
//! encyclopedia lives in `wikibot-client`.

use async_trait::async_trait;

/// A titled section of an article body, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into() }
    }
}

/// Raw content of a resolved article.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub title: String,
    pub summary: String,
    pub sections: Vec<Section>,
    pub url: String,
    pub images: Vec<String>,
}

/// The expected outcomes of a single-language lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Page(Page),
    /// The topic names several articles; candidate titles in source order.
    Disambiguation(Vec<String>),
    NotFound,
}

/// Unexpected lookup failure (network, HTTP status, malformed response).
#[derive(Debug, Clone, thiserror::Error)]
#[error("knowledge base fault: {0}")]
pub struct KbFault(pub String);

/// Lookup capability over a multilingual knowledge base.
///
/// Implementations enforce their own network timeouts.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Look up `topic` in the edition identified by `lang` (e.g. `"uz"`).
    async fn lookup(&self, topic: &str, lang: &str) -> Result<Lookup, KbFault>;
}
