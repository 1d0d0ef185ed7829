//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

/// Edition codes are interpolated into URLs, so keep them to `[a-z-]`.
pub fn is_valid_lang(code: &str) -> bool {
    (2..=12).contains(&code.len()) && code.chars().all(|c| c.is_ascii_lowercase() || c == '-')
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `resolve_timeout_ms` is shorter than `timeout_ms`
    /// - either language code is malformed, or both are the same
    /// - `wiki_api_url` lacks the `{lang}` placeholder
    /// - `max_message_len` is outside 512..=4096
    /// - `max_caption_len` is outside 128..=1024
    /// - `max_options`, `history_capacity` or `history_shown` is 0
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }
        if self.resolve_timeout_ms < self.timeout_ms {
            return Err(invalid("resolve_timeout_ms", "must not be shorter than timeout_ms"));
        }

        if !is_valid_lang(&self.primary_lang) {
            return Err(invalid("primary_lang", "must be 2-12 lowercase letters or '-'"));
        }
        if !is_valid_lang(&self.fallback_lang) {
            return Err(invalid("fallback_lang", "must be 2-12 lowercase letters or '-'"));
        }
        if self.primary_lang == self.fallback_lang {
            return Err(invalid("fallback_lang", "must differ from primary_lang"));
        }

        if !self.wiki_api_url.contains("{lang}") {
            return Err(invalid("wiki_api_url", "must contain the {lang} placeholder"));
        }

        if !(512..=4096).contains(&self.max_message_len) {
            return Err(invalid("max_message_len", "must be between 512 and 4096"));
        }
        if !(128..=1024).contains(&self.max_caption_len) {
            return Err(invalid("max_caption_len", "must be between 128 and 1024"));
        }

        if self.max_options == 0 {
            return Err(invalid("max_options", "must be greater than 0"));
        }
        if self.history_capacity == 0 {
            return Err(invalid("history_capacity", "must be greater than 0"));
        }
        if self.history_shown == 0 {
            return Err(invalid("history_shown", "must be greater than 0"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.history_shown > self.history_capacity {
            tracing::warn!(
                history_shown = self.history_shown,
                history_capacity = self.history_capacity,
                "history_shown exceeds history_capacity; only history_capacity entries can be shown"
            );
        }

        Ok(())
    }
}
