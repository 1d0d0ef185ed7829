//! MediaWiki client error types.

use std::sync::Arc;

use wikibot_core::KbFault;

/// Errors from the MediaWiki API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WikiError {
    /// Edition code that cannot be placed into an endpoint URL.
    #[error("invalid language code: {0}")]
    InvalidLanguage(String),

    /// API returned an `error` object.
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for WikiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { WikiError::Timeout } else { WikiError::Network(Arc::new(err)) }
    }
}

impl From<WikiError> for KbFault {
    fn from(err: WikiError) -> Self {
        KbFault(err.to_string())
    }
}
