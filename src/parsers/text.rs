use crate::parsers::stopwords::STOP_WORDS;
use std::collections::HashSet;

/// Removes English stop-words from whitespace-separated text
///
/// Matching is case-insensitive; surviving tokens keep their original casing
/// and are joined with single spaces.
pub fn remove_stop_words(text: &str) -> String {
    remove_words(text, &STOP_WORDS)
}

/// Removes every token whose lowercase form is in `stop_words`
pub fn remove_words(text: &str, stop_words: &HashSet<&str>) -> String {
    text.split_whitespace()
        .filter(|word| !stop_words.contains(word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}
