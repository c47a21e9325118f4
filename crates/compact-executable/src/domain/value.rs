//! # Typed Values
//!
//! Arguments passed to constructors and circuits, and results returned from
//! them.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use shared_types::AlignedValue;
use std::collections::BTreeMap;

use super::runtime::CompactError;

/// A typed argument or result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A floating-point number.
    Number(f64),
    /// An exact integer.
    BigInt(BigInt),
    /// A string.
    String(String),
    /// A boolean.
    Boolean(bool),
    /// A byte sequence.
    Bytes(Vec<u8>),
    /// An array or tuple.
    Array(Vec<Value>),
    /// A struct, by field name.
    Struct(BTreeMap<String, Value>),
    /// No value.
    Unit,
}

impl Value {
    /// JSON rendering: exact integers become decimal strings, bytes become
    /// number arrays, unit becomes `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Number(n) => serde_json::Number::from_f64(*n).map_or(Json::Null, Json::Number),
            Value::BigInt(n) => Json::String(n.to_string()),
            Value::String(s) => Json::String(s.clone()),
            Value::Boolean(b) => Json::Bool(*b),
            Value::Bytes(bytes) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Struct(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Unit => Json::Null,
        }
    }

    /// Encode a value sequence as a single aligned value.
    pub fn encode_all(values: &[Value]) -> Result<AlignedValue, CompactError> {
        bincode::serialize(values)
            .map(AlignedValue::new)
            .map_err(|err| CompactError::new(format!("failed to encode values: {err}")))
    }

    /// The value as a `u64`, if it is a non-negative integer in range.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::BigInt(n) => u64::try_from(n).ok(),
            Value::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64 => {
                Some(*n as u64)
            }
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::BigInt(BigInt::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_rendering() {
        let value = Value::Array(vec![
            Value::from(100),
            Value::from("hosky"),
            Value::from(true),
            Value::Bytes(vec![255, 255, 255]),
            Value::Unit,
        ]);
        assert_eq!(
            value.to_json(),
            json!(["100", "hosky", true, [255, 255, 255], null])
        );
    }

    #[test]
    fn test_struct_rendering() {
        let value = Value::Struct(BTreeMap::from([
            ("x".to_string(), Value::Number(3.0)),
            ("y".to_string(), Value::from(7)),
        ]));
        assert_eq!(value.to_json(), json!({ "x": 3.0, "y": "7" }));
    }

    #[test]
    fn test_as_u64() {
        assert_eq!(Value::from(5).as_u64(), Some(5));
        assert_eq!(Value::Number(2.0).as_u64(), Some(2));
        assert_eq!(Value::Number(2.5).as_u64(), None);
        assert_eq!(Value::BigInt(BigInt::from(-1)).as_u64(), None);
        assert_eq!(Value::from("1").as_u64(), None);
    }

    #[test]
    fn test_encode_distinguishes_values() {
        let a = Value::encode_all(&[Value::from(1)]).unwrap();
        let b = Value::encode_all(&[Value::from(2)]).unwrap();
        assert_ne!(a, b);
    }
}
