//! Knowledge data model: entries, events, topic patterns, and the request
//! shapes accepted at the boundary.

pub mod requests;
pub mod topic;
pub mod types;

/// Cut `content` to at most `max_chars` characters, appending `...` when
/// anything was dropped. Counts characters, not bytes.
pub fn truncate_chars(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_string(),
    }
}
