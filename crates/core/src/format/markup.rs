//! Helpers for the transport's legacy Markdown dialect.
//!
//! Only four characters are significant: `_`, `*`, `` ` `` and `[`. A
//! backslash directly before one of them escapes it; a backslash anywhere
//! else is literal. All lengths are counted in Unicode scalar values.

const SPECIAL: [char; 4] = ['_', '*', '`', '['];

/// Escape every markup-significant character in plain text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Wrap plain text in a bold marker pair.
///
/// Trailing backslashes are dropped since one directly before the closing
/// `*` would escape it. Text that ends up empty gets no markers.
pub fn bold(text: &str) -> String {
    let inner = text.trim_end_matches('\\').trim_end();
    if inner.is_empty() {
        return String::new();
    }
    format!("*{}*", escape(inner))
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut `text` to at most `max_chars` characters without breaking markup.
///
/// The cut never leaves a dangling escape backslash and never leaves an odd
/// number of unescaped `*` markers; if it would, it backs up to just before
/// the last opening marker. Returns the kept prefix and whether anything was
/// dropped.
pub fn truncate(text: &str, max_chars: usize) -> (&str, bool) {
    let Some((end, next)) = text.char_indices().nth(max_chars) else {
        return (text, false);
    };

    let mut kept = &text[..end];

    if kept.ends_with('\\') && SPECIAL.contains(&next) {
        kept = &kept[..kept.len() - 1];
    }

    let mut open_marker = None;
    let mut prev = None;
    for (idx, c) in kept.char_indices() {
        if c == '*' && prev != Some('\\') {
            open_marker = match open_marker {
                Some(_) => None,
                None => Some(idx),
            };
        }
        prev = Some(c);
    }

    if let Some(idx) = open_marker {
        kept = &kept[..idx];
    }

    (kept, true)
}
