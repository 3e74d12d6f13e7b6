use chrono::{DateTime, Utc};
use model::core::value::Value;

/// Infer a typed value from captured text: `null`, booleans, 32-bit integers,
/// floats, RFC3339 timestamps, then strings. Surrounding double quotes force
/// a string.
pub fn parse_captured_value(raw: &str) -> Value {
    let raw = raw.trim();

    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }

    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(b) = raw.to_lowercase().parse::<bool>() {
        return Value::Boolean(b);
    }
    if let Ok(i) = raw.parse::<i32>() {
        return Value::Int(i);
    }
    // `inf` and `NaN` parse as floats but are meant as text
    if raw.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Value::Timestamp(ts.with_timezone(&Utc));
    }

    Value::String(raw.to_string())
}

/// Convert a Value to its plain string form (no quoting)
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Timestamp(t) => t.to_rfc3339(),
        Value::Enum(_, member) => member.clone(),
        Value::Type(handle) => handle.full_name().to_string(),
        Value::Json(serde_json::Value::String(s)) => s.clone(),
        Value::Json(v) => v.to_string(),
        Value::Null => String::new(),
    }
}
