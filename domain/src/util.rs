//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters, ending with `…` when cut.
///
/// Counts characters, not bytes, so multi-byte titles never split.
pub fn truncate_title(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", kept.trim_end())
}
