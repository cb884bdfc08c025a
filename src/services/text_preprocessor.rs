use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::DocumentContext;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN is a valid regex pattern"));

static SENTENCE_TERMINATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("SENTENCE_TERMINATORS is a valid regex pattern"));

static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t\r\f\v]*\n").expect("BLANK_LINE is a valid regex pattern"));

/// Builds the document context from raw extracted text.
///
/// `full_text` is the input with every whitespace run collapsed to one space.
/// Sentences come from `full_text`; paragraphs come from the raw input, since
/// collapsing erases blank lines.
pub fn preprocess(raw: &str) -> DocumentContext {
    let full_text = collapse_whitespace(raw);
    let sentences = split_sentences(&full_text);
    let paragraphs = split_paragraphs(raw);
    let word_count = full_text.split_whitespace().count();
    let char_count = full_text.chars().count();

    DocumentContext {
        full_text,
        sentences,
        paragraphs,
        word_count,
        char_count,
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_TERMINATORS
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    BLANK_LINE
        .split(&normalized)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
