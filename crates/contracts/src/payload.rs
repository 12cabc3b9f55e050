//! Payload - the JSON object handed to a notify service

use serde_json::{Map, Value};

/// Outgoing notification payload
pub type Payload = Map<String, Value>;

/// Truthiness of an invocation attribute.
///
/// `null`, `false`, zero, empty strings, empty arrays and empty objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(obj) => !obj.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values() {
        for value in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ] {
            assert!(!is_truthy(&value), "expected falsy: {value}");
        }
    }

    #[test]
    fn test_truthy_values() {
        for value in [
            json!(true),
            json!(1),
            json!(-0.5),
            json!("x"),
            json!(["a"]),
            json!({"k": null}),
        ] {
            assert!(is_truthy(&value), "expected truthy: {value}");
        }
    }
}
