use serde::Serialize;

/// Structured text for the detail panel: pretty-printed JSON.
pub fn render<T: Serialize + ?Sized>(object: &T) -> String {
    match serde_json::to_string_pretty(object) {
        Ok(text) => text,
        Err(e) => format!("<unprintable: {}>", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_is_indented() {
        let text = render(&json!({"Id": "abc", "Tags": ["a"]}));
        assert_eq!(text, "{\n  \"Id\": \"abc\",\n  \"Tags\": [\n    \"a\"\n  ]\n}");
    }
}
