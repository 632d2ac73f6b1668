//! String helpers for log lines and history previews.

/// Truncate to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Single-line preview: whitespace runs collapsed, then truncated.
pub fn preview(s: &str, max_chars: usize) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_input_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
        assert_eq!(truncate("日本語テキスト", 4), "日本語…");
        assert_eq!(truncate("abc", 0), "…");
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(preview("plan:\n  step one\n\tstep two", 100), "plan: step one step two");
        assert_eq!(preview("a   b   c   d", 4), "a b…");
    }
}
