//! JSON codec for persisted configuration documents.
//!
//! Documents are written pretty-printed with 2-space indentation and a
//! trailing newline so hand-editing and diffing stay pleasant; key order
//! is stable because the persisted types use `BTreeMap`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn to_pretty_string<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Serializes a document to pretty-printed JSON bytes for file writing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    Ok(to_pretty_string(value)?.into_bytes())
}

/// Deserializes a document from file bytes, pretty-printed or minified.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use beacon_domain::environment::Module;
    use beacon_domain::request::{ApiDefinition, HttpMethod};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn cookie_overrides() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("UAT".to_string(), "token=u".to_string()),
            ("DAI".to_string(), "session=d".to_string()),
            ("SIT".to_string(), "session=s".to_string()),
        ])
    }

    #[test]
    fn test_output_is_pretty_with_trailing_newline() {
        let bytes = to_json_stable_bytes(&cookie_overrides()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("  \"DAI\""));
    }

    #[test]
    fn test_map_keys_come_out_sorted() {
        let bytes = to_json_stable_bytes(&cookie_overrides()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let dai = text.find("DAI").unwrap();
        let sit = text.find("SIT").unwrap();
        let uat = text.find("UAT").unwrap();
        assert!(dai < sit && sit < uat);
    }

    #[test]
    fn test_definition_survives_the_round_trip() {
        let mut api = ApiDefinition::new(
            "Subject components",
            "/subjectcomponent/list",
            HttpMethod::Post,
            Module::Ex,
        );
        api.body = serde_json::json!({"query": ""});

        let bytes = to_json_stable_bytes(&api).unwrap();
        let restored: ApiDefinition = from_json_bytes(&bytes).unwrap();
        assert_eq!(restored, api);
    }

    #[test]
    fn test_minified_input_is_accepted() {
        let restored: BTreeMap<String, String> =
            from_json_bytes(br#"{"SIT":"session=s"}"#).unwrap();
        assert_eq!(restored.get("SIT"), Some(&"session=s".to_string()));
    }

    #[test]
    fn test_shape_mismatch_is_a_decode_error() {
        let result: Result<BTreeMap<String, String>, _> = from_json_bytes(b"[1, 2, 3]");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
