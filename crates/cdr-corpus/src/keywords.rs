//! Searchable keyword extraction for rule names and applicability sentences.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s/\-]").expect("keyword filter pattern is valid"));

/// Common English function words never worth matching on.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him",
    "his", "how", "if", "in", "into", "is", "it", "its", "itself", "just", "may", "more", "most",
    "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "our", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "use", "used", "using", "very", "was", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would",
];

/// Tokens of an `**Application:**` sentence must be longer than this.
pub const APPLICATION_MIN_EXCLUSIVE: usize = 2;

/// Tokens of a rule name must be longer than this.
pub const NAME_MIN_EXCLUSIVE: usize = 1;

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Lower-cased tokens of `text` longer than `min_exclusive` characters,
/// with punctuation other than `/` and `-` removed and stop words dropped.
pub fn extract(text: &str, min_exclusive: usize) -> BTreeSet<String> {
    let cleaned = DISALLOWED.replace_all(text, "");
    cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > min_exclusive && !is_stop_word(token))
        .collect()
}

/// Keywords for a rule: its applicability sentence and its name, unioned.
pub fn rule_keywords(name: &str, application: &str) -> BTreeSet<String> {
    let mut keywords = extract(application, APPLICATION_MIN_EXCLUSIVE);
    keywords.extend(extract(name, NAME_MIN_EXCLUSIVE));
    keywords
}
