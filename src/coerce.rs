//! Lenient scalar fields for request bodies.
//!
//! Form clients send whatever the input holds: numbers may arrive as JSON
//! numbers or as strings, text may arrive as a number. For numeric fields,
//! blank strings and `null` mean "no value".

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text field: strings as-is, numbers and booleans in their JSON spelling.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected text, got {}", other))),
    }
}

/// `Some` when `f` is a whole number inside the i32 range.
fn whole_i32(f: f64) -> Option<i32> {
    if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

pub fn opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            let int = match n.as_i64() {
                Some(i) => i32::try_from(i).ok(),
                None => n.as_f64().and_then(whole_i32),
            };
            int.map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", n)))
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_i32))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected an integer, got {:?}", s)))
        }
        Some(other) => Err(D::Error::custom(format!("expected an integer, got {}", other))),
    }
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a number, got {}", n))),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Some(f)),
                _ => Err(D::Error::custom(format!("expected a number, got {:?}", s))),
            }
        }
        Some(other) => Err(D::Error::custom(format!("expected a number, got {}", other))),
    }
}
