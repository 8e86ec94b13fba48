//! Locating JSON objects embedded in model output

/// Slice from the first `{` to the last `}` (inclusive).
///
/// Models wrap JSON in prose or code fences; this strips both without trying
/// to balance braces.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object() {
        assert_eq!(extract_json_object(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_object_inside_prose_and_fences() {
        let text = "Claro! Aqui está:\n```json\n{\"suggestions\": []}\n```\nEspero ajudar.";
        assert_eq!(extract_json_object(text), Some("{\"suggestions\": []}"));
    }

    #[test]
    fn test_no_braces() {
        assert_eq!(extract_json_object("sem json aqui"), None);
        assert_eq!(extract_json_object("apenas {"), None);
        assert_eq!(extract_json_object("} invertido {"), None);
    }

    #[test]
    fn test_spans_multiple_objects() {
        // First to last brace, even across separate objects
        assert_eq!(extract_json_object("{a} e {b}"), Some("{a} e {b}"));
    }
}
