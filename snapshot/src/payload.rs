use serde_json::Value;

pub const STRUCTURED_CONTENT: &str = "structuredContent";

/// Unwraps a tool-result envelope to its structured payload.
///
/// Absent and `null` input yields `None`. An input carrying a truthy
/// `structuredContent` yields that field; anything else is returned as is. The
/// unwrap is applied once and does not recurse.
pub fn normalize(raw: Option<&Value>) -> Option<&Value> {
    let raw = raw.filter(|value| is_truthy(value))?;

    match raw.get(STRUCTURED_CONTENT) {
        Some(content) if is_truthy(content) => Some(content),
        _ => Some(raw),
    }
}

/// Owned variant of [`normalize`].
pub fn normalize_owned(raw: Option<Value>) -> Option<Value> {
    normalize(raw.as_ref()).cloned()
}

/// Host values follow script truthiness: `null`, `false`, `0` and `""` are empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
