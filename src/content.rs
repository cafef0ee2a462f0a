//! Content document schema check and commit encoding.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;

/// Top-level keys every content document must carry. Presence-only: the
/// shape inside each section is unconstrained.
pub const REQUIRED_KEYS: [&str; 3] = ["hero", "positions", "servers"];

/// Check that the document is an object with all required sections.
///
/// A key set to `null` counts as absent.
pub fn validate_document(doc: &Value) -> Result<(), String> {
    let Some(obj) = doc.as_object() else {
        return Err("Invalid content schema: expected a JSON object".to_string());
    };

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| obj.get(*key).map_or(true, Value::is_null))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Invalid content schema: missing {}",
            missing.join(", ")
        ))
    }
}

/// Encode the document the way it is committed: pretty-printed JSON,
/// then standard base64 as the contents API requires.
pub fn encode_pretty_base64(doc: &Value) -> Result<String, serde_json::Error> {
    let pretty = serde_json::to_string_pretty(doc)?;
    Ok(BASE64.encode(pretty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document() {
        let doc = json!({
            "hero": { "title": "Welcome" },
            "positions": [],
            "servers": [{ "name": "eu-1" }],
        });
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_missing_key_rejected() {
        let doc = json!({ "hero": {}, "positions": [] });
        let err = validate_document(&doc).unwrap_err();
        assert!(err.contains("servers"));
    }

    #[test]
    fn test_null_key_rejected() {
        let doc = json!({ "hero": null, "positions": [], "servers": [] });
        let err = validate_document(&doc).unwrap_err();
        assert!(err.contains("hero"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(validate_document(&json!([1, 2, 3])).is_err());
        assert!(validate_document(&json!("hero")).is_err());
    }

    #[test]
    fn test_extra_keys_allowed() {
        let doc = json!({ "hero": {}, "positions": [], "servers": [], "theme": "dark" });
        assert!(validate_document(&doc).is_ok());
    }

    #[test]
    fn test_encode_is_base64_of_pretty_json() {
        let doc = json!({ "hero": { "title": "Hi" }, "positions": [], "servers": [] });
        let encoded = encode_pretty_base64(&doc).unwrap();

        let decoded = BASE64.decode(encoded).unwrap();
        let text = String::from_utf8(decoded).unwrap();
        // Pretty printing puts each key on its own line
        assert!(text.contains("\n"));
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), doc);
    }
}
