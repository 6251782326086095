//! Post-processing: deterministic cleanup of converted documents.
//!
//! Converters are black boxes, so the text that comes back can carry
//! Windows line endings, trailing whitespace, runs of blank lines, or
//! invisible Unicode picked up from the source markup. These passes
//! normalise all of that without touching content. Each rule is a pure
//! `&str -> String` function applied in a fixed order: line endings first
//! so the later line-based rules see `\n` only, the final-newline rule
//! last.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a converted document.
///
/// Rules (applied in order):
/// 1. Normalise line endings (CRLF -> LF)
/// 2. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 3. Trim trailing whitespace per line
/// 4. Collapse runs of blank lines down to a single blank line
/// 5. Ensure the document ends with exactly one newline
pub fn clean_document(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = remove_invisible_chars(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    ensure_final_newline(&s)
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn remove_invisible_chars(input: &str) -> String {
    const INVISIBLE: [char; 6] = [
        '\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{00AD}',
    ];
    input.chars().filter(|c| !INVISIBLE.contains(c)).collect()
}

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
