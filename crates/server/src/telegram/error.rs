//! Telegram Bot API error types.

use std::sync::Arc;

/// Errors from the Telegram Bot API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TelegramError {
    /// The API answered `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api { code: u16, description: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error. The request URL (which carries the token) is stripped.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl TelegramError {
    /// Telegram rejected the request itself, e.g. an unreachable photo URL
    /// or a caption it cannot parse.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, TelegramError::Api { code: 400, .. })
    }
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TelegramError::Timeout } else { TelegramError::Network(Arc::new(err.without_url())) }
    }
}
