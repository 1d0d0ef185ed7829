//! Encoding of answer actions into the `keyboard_json` column.
//!
//! The column holds an array of rows, each row an array of button objects
//! `{"text", "url", "callback_data"}`. Every action is written as its own row.
//! On decode, rows are flattened back into the ordered action list and null
//! fields are dropped.

use crate::Error;
use crate::answer::LinkAction;
use serde::{Deserialize, Serialize};

/// On-disk shape of a single button.
#[derive(Debug, Serialize, Deserialize)]
struct ButtonRecord {
    text: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    callback_data: Option<String>,
}

/// Encode actions for storage.
pub fn encode(actions: &[LinkAction]) -> Result<String, Error> {
    let rows: Vec<Vec<ButtonRecord>> = actions
        .iter()
        .map(|a| vec![ButtonRecord { text: a.label.clone(), url: a.target.clone(), callback_data: None }])
        .collect();
    Ok(serde_json::to_string(&rows)?)
}

/// Decode a stored column value.
///
/// `NULL`, empty and JSON `null` all mean "no actions". Buttons that carry only
/// callback data keep their label with no target.
pub fn decode(raw: Option<&str>) -> Result<Vec<LinkAction>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };

    let rows: Option<Vec<Vec<ButtonRecord>>> = serde_json::from_str(raw)?;

    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|b| LinkAction { label: b.text, target: b.url })
        .collect())
}
