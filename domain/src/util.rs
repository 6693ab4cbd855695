//! Shared utility functions.

use std::borrow::Cow;

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview of a message for log output.
///
/// Newlines are flattened and anything beyond `max_bytes` is replaced by `...`.
pub fn preview(s: &str, max_bytes: usize) -> Cow<'_, str> {
    let cut = truncate_str(s, max_bytes);
    let truncated = cut.len() < s.len();
    if !truncated && !cut.contains('\n') {
        return Cow::Borrowed(s);
    }
    let mut out = cut.replace('\n', " ");
    if truncated {
        out.push_str("...");
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "vérité"; // 'é' is 2 bytes
        assert_eq!(truncate_str(s, 2), "v");
        assert_eq!(truncate_str(s, 3), "vé");
        assert_eq!(truncate_str(s, 100), s);
    }

    #[test]
    fn preview_short_message_is_borrowed() {
        assert!(matches!(preview("hello", 10), Cow::Borrowed("hello")));
    }

    #[test]
    fn preview_truncates_and_flattens() {
        assert_eq!(preview("book a flight\nto Paris", 13), "book a flight...");
        assert_eq!(preview("line one\nline two", 100), "line one line two");
    }
}
