//! Splitting a plain-text article extract into summary and sections.
//!
//! With `explaintext=1&exsectionformat=wiki` the API marks headings as
//! `== Title ==` lines (more `=` for deeper levels). Text before the first
//! heading is the summary; every heading of any level opens a section that
//! runs until the next heading.

use std::sync::LazyLock;

use regex::Regex;
use wikibot_core::Section;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(={2,6})\s*(.+?)\s*={2,6}\s*$").expect("heading pattern compiles"));

/// Split an extract into `(summary, sections)`.
pub fn split_extract(extract: &str) -> (String, Vec<Section>) {
    let mut headings = HEADING.captures_iter(extract).peekable();

    let summary_end = headings
        .peek()
        .and_then(|caps| caps.get(0))
        .map_or(extract.len(), |m| m.start());
    let summary = extract[..summary_end].trim().to_string();

    let mut sections = Vec::new();
    while let Some(caps) = headings.next() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let body_end = headings
            .peek()
            .and_then(|next| next.get(0))
            .map_or(extract.len(), |m| m.start());
        let body = extract[whole.end()..body_end].trim();
        sections.push(Section::new(title.as_str().trim(), body));
    }

    (summary, sections)
}
