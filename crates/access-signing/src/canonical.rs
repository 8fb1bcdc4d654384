//! Canonical JSON encoding
//!
//! The signature covers `route + canonical_json(params)`, so client and
//! server must produce byte-identical serializations of the parameter
//! map. The pinned rules:
//!
//! - object keys are sorted lexicographically by UTF-8 byte order, at
//!   every nesting depth
//! - arrays keep their order
//! - numbers and string escapes use serde_json's default formatting
//! - no insignificant whitespace
//!
//! Any client implementation, in any language, must reproduce these rules
//! exactly. Incidental map ordering is never relied on.

use serde_json::{Map, Value};

use crate::error::{AuthError, AuthResult};

/// Serialize a parameter value with the pinned canonical encoding.
///
/// # Example
///
/// ```
/// use access_signing::canonical_json;
/// use serde_json::json;
///
/// let a = json!({"b": 1, "a": {"d": 2, "c": 3}});
/// assert_eq!(canonical_json(&a).unwrap(), r#"{"a":{"c":3,"d":2},"b":1}"#);
/// ```
pub fn canonical_json(value: &Value) -> AuthResult<String> {
    serde_json::to_string(&canonicalize(value))
        .map_err(|e| AuthError::Internal(format!("canonical encoding failed: {}", e)))
}

/// Rebuild a value with object keys in sorted order at every depth.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_are_sorted() {
        let value = json!({"zeta": 1, "alpha": 2, "mid": 3});
        assert_eq!(
            canonical_json(&value).unwrap(),
            r#"{"alpha":2,"mid":3,"zeta":1}"#
        );
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let value = json!({"outer": {"b": {"z": 1, "a": 2}, "a": 3}});
        assert_eq!(
            canonical_json(&value).unwrap(),
            r#"{"outer":{"a":3,"b":{"a":2,"z":1}}}"#
        );
    }

    #[test]
    fn test_arrays_keep_order() {
        let value = json!({"list": [3, 1, 2]});
        assert_eq!(canonical_json(&value).unwrap(), r#"{"list":[3,1,2]}"#);
    }

    #[test]
    fn test_objects_inside_arrays_are_sorted() {
        let value = json!([{"b": 1, "a": 2}]);
        assert_eq!(canonical_json(&value).unwrap(), r#"[{"a":2,"b":1}]"#);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = json!({"x": 1, "y": [true, null, "s"]});
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&a).unwrap());
    }

    #[test]
    fn test_scalars() {
        assert_eq!(canonical_json(&json!(null)).unwrap(), "null");
        assert_eq!(canonical_json(&json!(42)).unwrap(), "42");
        assert_eq!(canonical_json(&json!("s")).unwrap(), r#""s""#);
    }
}
