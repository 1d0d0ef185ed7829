//! Per-user query history.
//!
//! Kept in memory only; it is lost on restart.

use std::collections::{HashMap, VecDeque};

use tokio::sync::Mutex;

/// Bounded history of past queries, per user id.
#[derive(Debug)]
pub struct History {
    entries: Mutex<HashMap<i64, VecDeque<String>>>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self { entries: Mutex::new(HashMap::new()), capacity: capacity.max(1) }
    }

    /// Append a query, evicting the oldest one when full.
    pub async fn record(&self, user_id: i64, query: &str) {
        let mut entries = self.entries.lock().await;
        let queries = entries.entry(user_id).or_default();
        if queries.len() == self.capacity {
            queries.pop_front();
        }
        queries.push_back(query.to_string());
    }

    /// The last `n` queries of a user, oldest first.
    pub async fn recent(&self, user_id: i64, n: usize) -> Vec<String> {
        let entries = self.entries.lock().await;
        entries
            .get(&user_id)
            .map(|queries| queries.iter().skip(queries.len().saturating_sub(n)).cloned().collect())
            .unwrap_or_default()
    }
}
