//! Keyword lookup for canned answers

use super::KnowledgeBase;

/// Return the canned response of the first entry, in declared order, with a
/// keyword contained in `message`. Matching is case-insensitive substring
/// search. Keywords are used as written, padding included; empty keywords
/// never match.
pub fn find_answer<'a>(message: &str, base: &'a KnowledgeBase) -> Option<&'a str> {
    let normalized = message.to_lowercase();

    base.entries()
        .iter()
        .find(|entry| {
            entry.keywords.iter().any(|keyword| {
                let keyword = keyword.to_lowercase();
                !keyword.is_empty() && normalized.contains(&keyword)
            })
        })
        .map(|entry| entry.response.as_str())
}
