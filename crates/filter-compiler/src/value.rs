use model::core::value::Value;
use tracing::debug;

/// Converts an evaluated value into the form stored in a term filter.
/// Enum members become their name and type handles their
/// `"<name>, <module>"` form; everything else is kept as is.
pub fn term_value(value: Value) -> Value {
    match value {
        Value::Enum(_, member) => Value::String(member),
        Value::Type(handle) => Value::String(handle.assembly_qualified_name()),
        other => other,
    }
}

/// A range bound, for the value types ranges are built over (integers and
/// timestamps). `None` means the comparison is left unfiltered.
pub fn range_bound(value: Value) -> Option<Value> {
    match value {
        Value::Int(_) | Value::Timestamp(_) => Some(value),
        other => {
            debug!(
                value_type = other.type_name(),
                "No range filter for bound of this type"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use model::core::type_handle::TypeHandle;

    #[test]
    fn test_term_value_conversions() {
        assert_eq!(
            term_value(Value::Enum("Color".into(), "Red".into())),
            Value::from("Red")
        );
        assert_eq!(
            term_value(Value::Type(TypeHandle::new("Shop.Book", "Shop"))),
            Value::from("Shop.Book, Shop")
        );
        assert_eq!(term_value(Value::Int(4)), Value::Int(4));

        let opaque = Value::Json(serde_json::json!([1, 2]));
        assert_eq!(term_value(opaque.clone()), opaque);
    }

    #[test]
    fn test_range_bound_types() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(range_bound(Value::Int(3)), Some(Value::Int(3)));
        assert_eq!(range_bound(Value::Timestamp(ts)), Some(Value::Timestamp(ts)));
        assert_eq!(range_bound(Value::Float(1.5)), None);
        assert_eq!(range_bound(Value::from("a")), None);
    }
}
