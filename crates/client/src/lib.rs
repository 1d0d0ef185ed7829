//! Client code for wikibot.
//!
//! This crate provides the MediaWiki Action API client that backs the
//! knowledge-base capability used by the resolver.

pub mod wiki;

pub use wiki::{WikiClient, WikiConfig, WikiError, split_extract};
