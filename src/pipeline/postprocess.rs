//! Post-processing: optional deterministic cleanup of model-written Markdown.
//!
//! Chat models asked for "Markdown" regularly wrap the whole answer in a
//! ` ```markdown ` fence, emit CRLF line endings, or pad the end with blank
//! lines. These passes fix the layout without touching the wording. They run
//! only when [`crate::config::SummaryConfig::clean_output`] is set; otherwise
//! the summary is written exactly as returned.

use once_cell::sync::Lazy;
use regex::Regex;

/// A single `&str → String` cleanup pass.
type Rule = fn(&str) -> String;

/// Passes in application order. Line endings are normalised before any
/// line-based pass, and fences are stripped before trailing whitespace is
/// trimmed so the fence regex sees the raw answer.
const RULES: &[Rule] = &[
    strip_outer_fence,
    normalise_line_endings,
    trim_line_ends,
    remove_invisible_chars,
    collapse_blank_lines,
    single_final_newline,
];

/// Apply every cleanup pass to a model answer.
pub fn clean_markdown(input: &str) -> String {
    RULES
        .iter()
        .fold(input.to_string(), |text, rule| rule(&text))
}

static RE_OUTER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```(?:markdown|md)?[ \t]*\r?\n(.*?)\r?\n```[ \t]*\z").unwrap()
});

fn strip_outer_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

fn trim_line_ends(input: &str) -> String {
    input
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Zero-width and BOM characters some models leak into their output.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

fn remove_invisible_chars(input: &str) -> String {
    input.chars().filter(|c| !INVISIBLE.contains(c)).collect()
}

static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// At most one empty line between blocks.
fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_RUN.replace_all(input, "\n\n").into_owned()
}

fn single_final_newline(input: &str) -> String {
    let body = input.trim_end_matches('\n');
    format!("{body}\n")
}
