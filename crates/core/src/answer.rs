//! Answer value types shared by the cache, the formatter and the transports.

use serde::{Deserialize, Serialize};

/// A single actionable reference attached to an answer.
///
/// Transports render it as a link button. The target may be absent, in which
/// case the action is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAction {
    pub label: String,
    pub target: Option<String>,
}

impl LinkAction {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self { label: label.into(), target: Some(target.into()) }
    }
}

/// A formatted, transport-ready answer.
///
/// This is both what the pipeline serves and what the cache persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub actions: Vec<LinkAction>,
    pub image: Option<String>,
}

/// A persisted answer row, keyed by its normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAnswer {
    pub key: String,
    pub answer: Answer,
}
