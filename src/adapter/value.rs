//! Total accessors over untrusted JSON.
//!
//! Provider payloads are never trusted to match their documented shape, so
//! adapters read them through these helpers: every lookup returns `None` (or
//! an empty slice) instead of failing when a field is missing, null, or of
//! the wrong type.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::finite_decimal;

/// Follow a chain of object keys.
pub fn at<'a>(value: Option<&'a Value>, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value?, |current, key| current.get(*key))
}

/// The elements of an array field, or an empty slice.
pub fn array(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// A finite number, accepting numeric strings.
pub fn number(value: Option<&Value>) -> Option<Decimal> {
    let raw = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    finite_decimal(raw)
}

/// A non-empty string, stringifying numbers.
pub fn text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
