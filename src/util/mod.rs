//! Utility modules: logging setup and log-friendly text helpers.

pub mod logging;

pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};

/// First `max_chars` characters of `text`, cut on a char boundary
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("abc", 200), "abc");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("ăîșțâ-rest", 5), "ăîșțâ");
        assert_eq!(preview("hello world", 5), "hello");
    }
}
