//! Token estimation and query term extraction.
//!
//! The engine does not ship a real tokenizer. Budgets are enforced
//! against a fixed four-characters-per-token estimate, which is close
//! enough for packing decisions and identical across runs.

/// Estimated token count of a text: `ceil(chars / 4)`.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Common words that carry no signal in a code query.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "all", "can", "with", "this", "that", "from",
    "into", "how", "what", "when", "where", "which", "does", "have", "will", "its",
];

/// Lowercased query terms: split on non-identifier characters, keep
/// terms longer than two characters, drop stop words.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| term.len() > 2 && !STOP_WORDS.contains(term))
        .map(str::to_string)
        .collect()
}
