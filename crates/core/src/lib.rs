//! Core types and shared functionality for wikibot.
//!
//! This crate provides:
//! - The resolve-and-cache pipeline (`resolve`)
//! - Answer formatting bounded to transport limits (`format`)
//! - Answer cache with SQLite backend (`cache`)
//! - The knowledge-base capability trait (`kb`)
//! - Unified error types and layered configuration

pub mod answer;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod kb;
pub mod messages;
pub mod resolve;

pub use answer::{Answer, CachedAnswer, LinkAction};
pub use cache::{CacheDb, CacheKey};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use format::FormatLimits;
pub use kb::{KbFault, KnowledgeBase, Lookup, Page, Section};
pub use resolve::{Origin, Pipeline, PipelineResult, PipelineSettings, Resolution};
