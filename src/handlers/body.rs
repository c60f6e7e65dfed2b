use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Parse a request body that must be a non-empty JSON object.
///
/// A missing, malformed or empty body is reported as "No data provided".
pub fn json_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        _ => Err(ApiError::no_data()),
    }
}

/// Field of a JSON object, `None` when absent, `null` or an empty string
pub fn provided_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key)
        .filter(|value| !value.is_null() && value.as_str() != Some(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_object() {
        let map = json_object(&Bytes::from_static(br#"{"name": "Groceries"}"#)).unwrap();
        assert_eq!(map["name"], "Groceries");

        let bodies: [&[u8]; 5] = [b"", b"{}", b"[1, 2]", b"null", b"{broken"];
        for body in bodies {
            let err = json_object(&Bytes::copy_from_slice(body)).unwrap_err();
            assert_eq!(err.to_string(), "No data provided");
        }
    }

    #[test]
    fn test_provided_field() {
        let map = json!({"a": "x", "b": "", "c": null, "d": 42})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(provided_field(&map, "a"), Some(&json!("x")));
        assert_eq!(provided_field(&map, "b"), None);
        assert_eq!(provided_field(&map, "c"), None);
        assert_eq!(provided_field(&map, "d"), Some(&json!(42)));
        assert_eq!(provided_field(&map, "missing"), None);
    }
}
