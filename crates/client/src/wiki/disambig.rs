//! Candidate titles from the wikitext of a disambiguation page.
//!
//! Each candidate is a bullet line (`*` or `#`) whose first main-namespace
//! link names the article. Lines are read top to bottom so candidates keep
//! the order editors gave them.

use std::sync::LazyLock;

use regex::Regex;

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]|]+)(?:\|[^\[\]]*)?\]\]").expect("link pattern compiles"));

/// Candidate titles in page order, without duplicates.
pub fn list_entries(wikitext: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();

    for line in wikitext.lines() {
        let line = line.trim_start();
        if !line.starts_with(['*', '#']) {
            continue;
        }
        let first = LINK
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .find_map(|target| article_title(target.as_str()));
        if let Some(title) = first.filter(|t| !entries.contains(t)) {
            entries.push(title);
        }
    }

    entries
}

/// Normalized article title for a link target, or `None` for links outside
/// the main namespace (files, categories, interwiki, section-only anchors).
fn article_title(target: &str) -> Option<String> {
    let target = target.split('#').next().unwrap_or_default().trim();
    if target.is_empty() || target.starts_with(':') {
        return None;
    }
    // `Prefix:Name` with no space after the colon is a namespace or interwiki link.
    let namespaced = target
        .split_once(':')
        .is_some_and(|(prefix, rest)| !prefix.contains(' ') && !rest.starts_with(' '));
    if namespaced {
        return None;
    }
    Some(target.replace('_', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MERCURY: &str = "'''Mercury''' commonly refers to:\n\
* [[Mercury (planet)]], the closest planet to the Sun\n\
* [[Mercury (element)|Mercury]], a chemical element\n\
\n\
== Other uses ==\n\
* [[Mercury (mythology)]], a Roman god, see also [[Hermes]]\n\
* [[File:Mercury.png|thumb]] [[Freddie_Mercury]] ([[w:en:Freddie|interwiki]])\n\
* [[Mercury (planet)#Orbit|orbit]] of the planet\n\
Plain prose mentioning [[Quicksilver]].\n\
[[Category:Disambiguation pages]]\n";

    #[test]
    fn test_first_link_of_each_bullet_in_order() {
        assert_eq!(
            list_entries(MERCURY),
            vec!["Mercury (planet)", "Mercury (element)", "Mercury (mythology)", "Freddie Mercury"]
        );
    }

    #[test]
    fn test_keeps_titles_with_spaced_colon() {
        assert_eq!(list_entries("* [[Star Wars: Episode I]]"), vec!["Star Wars: Episode I"]);
    }

    #[test]
    fn test_numbered_lines_and_no_links() {
        assert_eq!(list_entries("# [[Zeta]]\n# [[Alpha]]"), vec!["Zeta", "Alpha"]);
        assert!(list_entries("No bullets here.\n* nor links").is_empty());
    }
}
