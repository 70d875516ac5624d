//! Model value helpers

use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Name of the JSON kind of a value, as used in error messages
#[must_use]
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert any serializable record into a model value.
///
/// Struct fields become object keys under their serialized names, so a path
/// addresses them the same way it addresses keys of a JSON document.
///
/// # Errors
///
/// Returns [`Error::Conversion`] when the record cannot be serialized, for
/// example a map with non-string keys.
pub fn to_model<T: Serialize + ?Sized>(record: &T) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| Error::conversion("model", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Address {
        #[serde(rename = "streetAddress")]
        street: String,
        locality: String,
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&Value::Null), "null");
        assert_eq!(kind_of(&json!(true)), "boolean");
        assert_eq!(kind_of(&json!(1.5)), "number");
        assert_eq!(kind_of(&json!("x")), "string");
        assert_eq!(kind_of(&json!([])), "array");
        assert_eq!(kind_of(&json!({})), "object");
    }

    #[test]
    fn test_struct_fields_become_keys() {
        let address = Address {
            street: "10 Downing Street".to_string(),
            locality: "City of Westminster".to_string(),
        };

        let model = to_model(&address).unwrap();
        assert_eq!(
            model,
            json!({
                "streetAddress": "10 Downing Street",
                "locality": "City of Westminster"
            })
        );
    }

    #[test]
    fn test_non_string_keys_fail() {
        let mut record = BTreeMap::new();
        record.insert((1, 2), "pair");

        let err = to_model(&record).unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }
}
