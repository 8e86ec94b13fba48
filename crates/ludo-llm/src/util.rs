//! Common utilities shared by the backends

/// Minimum key length to display partial key
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Number of characters to show at start/end of masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Mask API key for safe display in logs
///
/// Shows first 4 and last 4 characters for keys longer than 8 characters,
/// otherwise shows "****" to prevent exposure of short keys.
///
/// # Examples
/// ```
/// use ludo_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("gsk_1234567890abcdef"), "gsk_...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY || !key.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &key[..KEY_MASK_VISIBLE_CHARS],
        &key[key.len() - KEY_MASK_VISIBLE_CHARS..]
    )
}

/// Validate API key is not empty and has minimum length
///
/// Returns an error message if validation fails, None if valid.
#[must_use]
pub fn validate_api_key(key: &str, backend_name: &str) -> Option<String> {
    if key.is_empty() {
        return Some(format!("{} API key is required", backend_name));
    }
    if key.len() < MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY {
        return Some(format!(
            "{} API key appears to be invalid (too short)",
            backend_name
        ));
    }
    None
}

/// Take at most `max_chars` characters, never splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key_long() {
        let key = "AIza1234567890abcdefghij";
        let masked = mask_api_key(key);
        assert_eq!(masked, "AIza...ghij");
        assert!(!masked.contains("567890"));
    }

    #[test]
    fn test_mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("", "Groq").is_some());
        assert!(validate_api_key("short", "Groq").is_some());
        assert!(validate_api_key("gsk_valid-api-key-12345", "Groq").is_none());
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        let text = "ação educacional";
        assert_eq!(truncate_chars(text, 4), "ação");
        assert_eq!(truncate_chars(text, 100), text);
        assert_eq!(truncate_chars("", 3), "");
    }
}
