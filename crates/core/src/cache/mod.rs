//! SQLite-backed answer cache.
//!
//! This module provides a persistent key→answer store using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Normalized query keys (case and whitespace folded)
//! - Upsert writes with last-writer-wins semantics
//! - Automatic schema migrations
//! - WAL mode so readers never wait on the writer
//!
//! Entries are never expired or purged here.

pub mod answers;
pub mod connection;
pub mod key;
pub mod keyboard;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::CacheKey;
