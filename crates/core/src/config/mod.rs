//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WIKIBOT_*, plus a bare TOKEN for the bot token)
//! 2. TOML config file (if WIKIBOT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::format::FormatLimits;

mod validation;

pub use validation::{ConfigError, is_valid_lang};

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WIKIBOT_*)
/// 2. TOML config file (if WIKIBOT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Telegram bot token.
    ///
    /// Set via WIKIBOT_TELEGRAM_TOKEN, or the bare TOKEN variable when that
    /// is unset. Required only by the bot binary.
    #[serde(default)]
    pub telegram_token: Option<String>,

    /// Path to SQLite answer cache.
    ///
    /// Set via WIKIBOT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via WIKIBOT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Knowledge-base HTTP request timeout in milliseconds.
    ///
    /// Set via WIKIBOT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Deadline for a whole pipeline call, layered on by the bot.
    ///
    /// Set via WIKIBOT_RESOLVE_TIMEOUT_MS environment variable.
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,

    /// Edition tried first.
    #[serde(default = "default_primary_lang")]
    pub primary_lang: String,

    /// Edition tried when the primary one has no page.
    #[serde(default = "default_fallback_lang")]
    pub fallback_lang: String,

    /// MediaWiki API endpoint template; `{lang}` is replaced by the edition code.
    #[serde(default = "default_wiki_api_url")]
    pub wiki_api_url: String,

    /// Telegram Bot API base URL.
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Maximum answer length, in characters.
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    /// Maximum photo caption length, in characters.
    #[serde(default = "default_max_caption_len")]
    pub max_caption_len: usize,

    /// Disambiguation candidates listed to the user.
    #[serde(default = "default_max_options")]
    pub max_options: usize,

    /// Queries remembered per caller.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Queries shown by /history.
    #[serde(default = "default_history_shown")]
    pub history_shown: usize,

    /// Long-poll timeout for getUpdates, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Interval between "searching" placeholder edits.
    #[serde(default = "default_animation_interval_ms")]
    pub animation_interval_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./wiki_cache.db")
}

fn default_user_agent() -> String {
    "wikibot/0.1 (https://github.com/wikibot/wikibot)".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_resolve_timeout_ms() -> u64 {
    60_000
}

fn default_primary_lang() -> String {
    "uz".into()
}

fn default_fallback_lang() -> String {
    "en".into()
}

fn default_wiki_api_url() -> String {
    "https://{lang}.wikipedia.org/w/api.php".into()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".into()
}

fn default_max_message_len() -> usize {
    4000
}

fn default_max_caption_len() -> usize {
    1024
}

fn default_max_options() -> usize {
    7
}

fn default_history_capacity() -> usize {
    20
}

fn default_history_shown() -> usize {
    5
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_animation_interval_ms() -> u64 {
    800
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
            primary_lang: default_primary_lang(),
            fallback_lang: default_fallback_lang(),
            wiki_api_url: default_wiki_api_url(),
            telegram_api_url: default_telegram_api_url(),
            max_message_len: default_max_message_len(),
            max_caption_len: default_max_caption_len(),
            max_options: default_max_options(),
            history_capacity: default_history_capacity(),
            history_shown: default_history_shown(),
            poll_timeout_secs: default_poll_timeout_secs(),
            animation_interval_ms: default_animation_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    pub fn format_limits(&self) -> FormatLimits {
        FormatLimits { max_message_len: self.max_message_len, max_caption_len: self.max_caption_len }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WIKIBOT_`, then a bare `TOKEN`
    /// 2. TOML file from `WIKIBOT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment behind [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WIKIBOT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment
            .merge(Env::raw().only(&["TOKEN"]).map(|_| "telegram_token".into()))
            .merge(
                Env::prefixed("WIKIBOT_")
                    .ignore(&["CONFIG_FILE"])
                    .map(|key| key.as_str().to_lowercase().into())
                    .split("__"),
            )
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Telegram token, required before the bot can start.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the token is unset or blank.
    pub fn require_telegram_token(&self) -> Result<&str, ConfigError> {
        self.telegram_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "telegram_token".into(),
                hint: "Set WIKIBOT_TELEGRAM_TOKEN (or TOKEN) in the environment or .env file".into(),
            })
    }
}
