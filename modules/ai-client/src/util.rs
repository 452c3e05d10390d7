/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// The span from the first `open` to the last `close`, inclusive.
fn delimited_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// The outermost `{...}` span of a free-text response.
pub fn json_object_span(text: &str) -> Option<&str> {
    delimited_span(text, '{', '}')
}

/// The outermost `[...]` span of a free-text response.
pub fn json_array_span(text: &str) -> Option<&str> {
    delimited_span(text, '[', ']')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hello 世界";
        let truncated = truncate_to_char_boundary(text, 8);
        assert!(truncated.len() <= 8);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn test_truncate_within_bounds() {
        let text = "Hello";
        assert_eq!(truncate_to_char_boundary(text, 100), "Hello");
    }

    #[test]
    fn test_json_object_span_ignores_surrounding_prose() {
        let text = "Sure! Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope that helps.";
        assert_eq!(json_object_span(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_json_array_span() {
        assert_eq!(json_array_span("x [1, [2]] y"), Some("[1, [2]]"));
        assert_eq!(json_array_span("no brackets"), None);
        assert_eq!(json_array_span("] backwards ["), None);
    }

    #[test]
    fn test_json_object_span_missing() {
        assert_eq!(json_object_span("plain text"), None);
        assert_eq!(json_object_span("{ unterminated"), None);
    }
}
