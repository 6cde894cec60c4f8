//! Required-field validation and per-field type coercion.

use serde_json::{Number, Value};

use crate::error::ShelfError;
use crate::fields::FieldSchema;
use crate::store::Fields;

/// How a required field is judged missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRule {
    /// Absent or falsy (`null`, `""`, `false`, `0`)
    Truthy,
    /// Absent or `null`
    Present,
}

/// Returns true for values a loosely typed caller treats as false.
pub fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Checks `required` against `payload`, reporting missing fields in
/// `required` order.
pub fn validate_required(
    payload: &Fields,
    required: &[&str],
    rule: RequiredRule,
) -> Result<(), ShelfError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|field| {
            let value = payload.get(**field);
            match rule {
                RequiredRule::Truthy => is_falsy(value),
                RequiredRule::Present => matches!(value, None | Some(Value::Null)),
            }
        })
        .map(|field| field.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ShelfError::MissingFields { fields: missing })
    }
}

/// Coerces one raw value to the stored type of `key`.
///
/// Numeric fields become a number, with `0` for anything absent, empty or
/// unparsable and `1`/`0` for booleans. Other fields become a string, with
/// `""` for absent or null.
/// The derived position field yields `None` and must not be written.
pub fn normalize_field(key: &str, value: Option<&Value>, schema: &FieldSchema) -> Option<Value> {
    if schema.is_derived(key) {
        return None;
    }
    if schema.is_numeric(key) {
        Some(normalize_number(value))
    } else {
        Some(Value::String(text_form(value)))
    }
}

fn normalize_number(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Value::Number(n.clone()),
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|n| n.is_finite())
            .map(number_value)
            .unwrap_or_else(|| Value::from(0)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(number_value)
            .unwrap_or_else(|| Value::from(0)),
        Some(Value::Bool(b)) => Value::from(u8::from(*b)),
        _ => Value::from(0),
    }
}

/// Integral values are stored as integers so `120` never reads back as `120.0`.
fn number_value(n: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0))
    }
}

/// String form of a cell value, as used for display, key comparison and search.
pub fn text_form(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
