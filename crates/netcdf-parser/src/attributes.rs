//! Conversion of NetCDF attribute values to JSON.

use netcdf::AttributeValue;
use serde_json::Value;

/// Convert an attribute value to JSON. Non-finite floats become `null`.
pub fn to_json(value: AttributeValue) -> Value {
    use AttributeValue::*;

    match value {
        Uchar(v) => Value::from(v),
        Schar(v) => Value::from(v),
        Ushort(v) => Value::from(v),
        Short(v) => Value::from(v),
        Uint(v) => Value::from(v),
        Int(v) => Value::from(v),
        Ulonglong(v) => Value::from(v),
        Longlong(v) => Value::from(v),
        Float(v) => Value::from(v as f64),
        Double(v) => Value::from(v),
        Str(v) => Value::from(v),
        Uchars(v) => list(v),
        Schars(v) => list(v),
        Ushorts(v) => list(v),
        Shorts(v) => list(v),
        Uints(v) => list(v),
        Ints(v) => list(v),
        Ulonglongs(v) => list(v),
        Longlongs(v) => list(v),
        Floats(v) => Value::Array(v.into_iter().map(|f| Value::from(f as f64)).collect()),
        Doubles(v) => list(v),
        Strs(v) => list(v),
        #[allow(unreachable_patterns)]
        _ => Value::Null,
    }
}

fn list<T: Into<Value>>(items: Vec<T>) -> Value {
    Value::Array(items.into_iter().map(Into::into).collect())
}

/// Map the string sentinels `"null"` / `"none"` (any case) to JSON null.
pub fn normalize_null(value: Value) -> Value {
    match value {
        Value::String(ref s) if s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("none") => Value::Null,
        other => other,
    }
}

/// Numeric reading of a JSON attribute, accepting numeric strings.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) if items.len() == 1 => as_f64(&items[0]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(to_json(AttributeValue::Short(-3)), json!(-3));
        assert_eq!(to_json(AttributeValue::Double(1.5)), json!(1.5));
        assert_eq!(to_json(AttributeValue::Str("CF-1.8".into())), json!("CF-1.8"));
        assert_eq!(to_json(AttributeValue::Double(f64::NAN)), Value::Null);
    }

    #[test]
    fn test_list_conversion() {
        assert_eq!(to_json(AttributeValue::Ints(vec![1, 2])), json!([1, 2]));
        assert_eq!(to_json(AttributeValue::Floats(vec![0.5])), json!([0.5]));
    }

    #[test]
    fn test_normalize_null() {
        assert_eq!(normalize_null(json!("NULL")), Value::Null);
        assert_eq!(normalize_null(json!("None")), Value::Null);
        assert_eq!(normalize_null(json!("nonexistent")), json!("nonexistent"));
        assert_eq!(normalize_null(json!(0)), json!(0));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(as_f64(&json!(40)), Some(40.0));
        assert_eq!(as_f64(&json!(" -10.5 ")), Some(-10.5));
        assert_eq!(as_f64(&json!([3.0])), Some(3.0));
        assert_eq!(as_f64(&json!("north")), None);
    }
}
