//! Answer formatting.
//!
//! Turns raw article content into a bounded, sectioned message:
//!
//! - A header naming the topic and the encyclopedia edition
//! - The summary, then body sections in source order
//! - Navigational/meta sections (references, external links, ...) skipped
//! - A `"\n\n..."` marker wherever content had to be cut
//! - One raster image and one "read full article" action
//!
//! Formatting is pure; the same page always yields the same answer.

pub mod markup;

use crate::answer::{Answer, LinkAction};
use crate::kb::{Page, Section};
use crate::messages;
use markup::{bold, char_len, escape, truncate};

/// Marker appended wherever message content was cut.
pub const ELLIPSIS: &str = "\n\n...";

/// Suffix appended to a caption that had to be shortened.
pub const CAPTION_SUFFIX: &str = "\n\n...To'liq maqolani o'qish uchun tugmani bosing.";

/// Longest topic echoed back in the header.
const MAX_TOPIC_CHARS: usize = 128;

const RASTER_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Section titles (lower-cased) that never make it into an answer.
pub const EXCLUDED_SECTIONS: &[&str] = &[
    "see also",
    "references",
    "external links",
    "footnotes",
    "bibliography",
    "further reading",
    "disclaimer",
    "notes",
    "citations",
    "g'alereya",
    "adabiyotlar",
    "havolalar",
    "ko'proq ma'lumot",
    "tashqi havolalar",
    "manbalar",
    "galereya",
    "qo'shimcha o'qish",
    "linklar",
    "shuningdek qarang",
    "bibliografiya",
    "eslatmalar",
    "ijtimoiy tarmoqlar",
];

/// Transport-imposed length limits, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatLimits {
    pub max_message_len: usize,
    pub max_caption_len: usize,
}

impl Default for FormatLimits {
    fn default() -> Self {
        Self { max_message_len: 4000, max_caption_len: 1024 }
    }
}

/// Format a resolved page found in edition `lang` for the query `topic`.
pub fn format_page(page: &Page, lang: &str, topic: &str, limits: &FormatLimits) -> Answer {
    let max = limits.max_message_len;
    let topic: String = topic.chars().take(MAX_TOPIC_CHARS).collect();

    let mut text = messages::answer_header(&topic, lang);
    let budget = max.saturating_sub(char_len(ELLIPSIS));

    let summary = escape(page.summary.trim());
    let (kept, cut) = truncate(&summary, budget.saturating_sub(char_len(&text)));
    text.push_str(kept.trim_end());

    if cut {
        text.push_str(ELLIPSIS);
    } else {
        append_sections(&mut text, &page.sections, max);
    }

    if char_len(&text) > max {
        text = truncate(&text, max).0.to_string();
    }

    Answer {
        text,
        actions: vec![LinkAction::new(messages::read_more_label(lang), page.url.clone())],
        image: pick_image(&page.images),
    }
}

fn append_sections(text: &mut String, sections: &[Section], max: usize) {
    let ellipsis_len = char_len(ELLIPSIS);

    for section in sections {
        let title = section.title.trim();
        let body = section.body.trim();
        if body.is_empty() || is_excluded(title) {
            continue;
        }

        let heading = bold(title);
        let snippet = if heading.is_empty() {
            format!("\n\n{}", escape(body))
        } else {
            format!("\n\n{heading}\n{}", escape(body))
        };

        let used = char_len(text);
        if used + char_len(&snippet) + ellipsis_len > max {
            let remaining = max.saturating_sub(used + ellipsis_len);
            let (kept, _) = truncate(&snippet, remaining);
            text.push_str(kept.trim_end());
            text.push_str(ELLIPSIS);
            return;
        }

        text.push_str(&snippet);
    }
}

/// Whether a section title names a navigational or meta section.
pub fn is_excluded(title: &str) -> bool {
    let folded: String = title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '‘' | '’' | 'ʻ' | 'ʼ' | '`' => '\'',
            other => other,
        })
        .collect();
    EXCLUDED_SECTIONS.contains(&folded.as_str())
}

/// First image whose path ends in a raster extension.
pub fn pick_image(images: &[String]) -> Option<String> {
    images
        .iter()
        .find(|candidate| {
            let path = match url::Url::parse(candidate) {
                Ok(parsed) => parsed.path().to_lowercase(),
                Err(_) => candidate.to_lowercase(),
            };
            RASTER_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        })
        .cloned()
}

/// Fit an answer text into a photo caption of at most `limit` characters.
pub fn clamp_caption(text: &str, limit: usize) -> String {
    if char_len(text) <= limit {
        return text.to_string();
    }

    let suffix_len = char_len(CAPTION_SUFFIX);
    if limit <= suffix_len {
        return truncate(text, limit).0.to_string();
    }

    let (kept, _) = truncate(text, limit - suffix_len);
    format!("{}{}", kept.trim_end(), CAPTION_SUFFIX)
}
