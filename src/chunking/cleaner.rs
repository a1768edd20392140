//! Whitespace and artifact cleanup for raw text files.

use regex::Regex;
use std::sync::OnceLock;

fn inline_whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\u{00A0}\u{000B}\u{000C}]+").expect("valid regex"))
}

/// Clean raw document text.
///
/// Strips a leading byte-order mark and control characters, collapses runs of
/// spaces and tabs to one space, trims each line and removes empty lines.
pub fn clean_text(raw: &str) -> String {
    let text = raw.trim_start_matches('\u{feff}');

    text.lines()
        .map(|line| {
            let line: String = line
                .chars()
                .filter(|c| !c.is_control() || *c == '\t')
                .collect();
            inline_whitespace().replace_all(&line, " ").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
