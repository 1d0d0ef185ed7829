//! Tiered resolve-and-cache pipeline.
//!
//! A single query moves through:
//!
//! 1. Normalize to a [`CacheKey`] and read the cache; a hit is served as-is.
//! 2. Look the topic up in the primary edition.
//! 3. If (and only if) that edition has no such page, look it up in the
//!    fallback edition.
//! 4. A found page is formatted, written to the cache and served.
//!
//! Disambiguation pages, misses and faults end the query without touching the
//! cache. Storage faults are logged and never change what the caller gets.

use std::sync::Arc;

use crate::answer::Answer;
use crate::cache::key::collapse_whitespace;
use crate::cache::{CacheDb, CacheKey};
use crate::config::AppConfig;
use crate::format::{FormatLimits, format_page};
use crate::kb::{KnowledgeBase, Lookup};
use crate::messages;

/// Knobs for the pipeline, usually derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub primary_lang: String,
    pub fallback_lang: String,
    pub limits: FormatLimits,
    /// How many disambiguation candidates to list.
    pub max_options: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            primary_lang: "uz".into(),
            fallback_lang: "en".into(),
            limits: FormatLimits::default(),
            max_options: 7,
        }
    }
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            primary_lang: config.primary_lang.clone(),
            fallback_lang: config.fallback_lang.clone(),
            limits: config.format_limits(),
            max_options: config.max_options,
        }
    }
}

/// Where a served answer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Lookup { lang: String },
}

/// Tagged outcome of resolving one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Served { answer: Answer, origin: Origin },
    Ambiguous { options: Vec<String>, lang: String },
    NotFound,
    Error(String),
    /// The query was blank after trimming.
    EmptyQuery,
}

impl Resolution {
    pub fn kind(&self) -> &'static str {
        match self {
            Resolution::Served { .. } => "served",
            Resolution::Ambiguous { .. } => "ambiguous",
            Resolution::NotFound => "not_found",
            Resolution::Error(_) => "error",
            Resolution::EmptyQuery => "empty_query",
        }
    }
}

/// What a transport receives from [`Pipeline::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Answer(Answer),
    /// Plain user-facing text for every non-served outcome.
    Message(String),
}

/// The resolve-and-cache pipeline.
///
/// Cheap to share behind an `Arc`; concurrent calls are independent.
pub struct Pipeline {
    cache: CacheDb,
    kb: Arc<dyn KnowledgeBase>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(cache: CacheDb, kb: Arc<dyn KnowledgeBase>, settings: PipelineSettings) -> Self {
        Self { cache, kb, settings }
    }

    /// Resolve a raw query into an answer or a user-facing message.
    ///
    /// Never fails. Runs to completion once started; callers wanting a
    /// deadline wrap this future in `tokio::time::timeout`.
    pub async fn resolve(&self, query: &str) -> PipelineResult {
        let topic = collapse_whitespace(query);
        match self.resolve_outcome(query).await {
            Resolution::Served { answer, .. } => PipelineResult::Answer(answer),
            Resolution::Ambiguous { options, lang } => {
                PipelineResult::Message(messages::ambiguous(&topic, &lang, &options))
            }
            Resolution::NotFound => PipelineResult::Message(messages::not_found(&topic)),
            Resolution::Error(_) => PipelineResult::Message(messages::LOOKUP_FAILED.to_string()),
            Resolution::EmptyQuery => PipelineResult::Message(messages::EMPTY_QUERY.to_string()),
        }
    }

    /// Resolve a raw query, keeping the tagged outcome.
    pub async fn resolve_outcome(&self, query: &str) -> Resolution {
        let key = CacheKey::normalize(query);
        if key.is_empty() {
            return Resolution::EmptyQuery;
        }

        match self.cache.get_answer(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "cache hit");
                return Resolution::Served { answer: cached.answer, origin: Origin::Cache };
            }
            Ok(None) => tracing::debug!(key = %key, "cache miss"),
            Err(e) => tracing::warn!(key = %key, code = e.code(), error = %e, "cache read failed, treating as miss"),
        }

        let topic = collapse_whitespace(query);
        let resolution = self.lookup_tiers(&topic).await;

        if let Resolution::Served { answer, .. } = &resolution {
            self.store(&key, answer).await;
        }

        tracing::info!(key = %key, outcome = resolution.kind(), "query resolved");
        resolution
    }

    async fn lookup_tiers(&self, topic: &str) -> Resolution {
        let tiers = [self.settings.primary_lang.as_str(), self.settings.fallback_lang.as_str()];

        for lang in tiers {
            match self.kb.lookup(topic, lang).await {
                Ok(Lookup::Page(page)) => {
                    tracing::info!(topic, lang, title = %page.title, "page found");
                    let answer = format_page(&page, lang, topic, &self.settings.limits);
                    return Resolution::Served { answer, origin: Origin::Lookup { lang: lang.to_string() } };
                }
                Ok(Lookup::Disambiguation(mut options)) => {
                    tracing::info!(topic, lang, candidates = options.len(), "topic is ambiguous");
                    options.truncate(self.settings.max_options);
                    return Resolution::Ambiguous { options, lang: lang.to_string() };
                }
                Ok(Lookup::NotFound) => {
                    tracing::info!(topic, lang, "no page in this edition");
                }
                Err(fault) => {
                    tracing::error!(topic, lang, error = %fault, "lookup failed");
                    return Resolution::Error(fault.to_string());
                }
            }
        }

        Resolution::NotFound
    }

    async fn store(&self, key: &CacheKey, answer: &Answer) {
        match self.cache.put_answer(key, answer).await {
            Ok(()) => tracing::info!(key = %key, "answer cached"),
            Err(e) => tracing::warn!(key = %key, code = e.code(), error = %e, "failed to cache answer"),
        }
    }
}
