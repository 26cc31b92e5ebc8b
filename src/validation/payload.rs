//! Helpers for reading loosely-typed JSON request bodies.
//!
//! Payloads arrive as arbitrary key/value maps. Required fields count as
//! present only when they are "truthy" for a JSON client: missing keys,
//! `null`, `false`, `0` and `""` are all treated as absent. Optional fields are
//! checked whenever a non-null value was sent, so an explicit `0` still fails
//! its format rule.

use serde_json::{Map, Number, Value};

pub type Payload = Map<String, Value>;

#[must_use]
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Returns the value stored under `key` when it is present.
#[must_use]
pub fn present<'a>(payload: &'a Payload, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|v| is_present(Some(v)))
}

/// Decimal string form of a scalar.
///
/// Strings are taken verbatim. Numbers are printed the way a JavaScript
/// client prints them, so `5.0` becomes `"5"` while `5.9` stays `"5.9"`.
/// Any other JSON type has no decimal form.
#[must_use]
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format_number(n)),
        _ => None,
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }

    let f = n.as_f64().unwrap_or(f64::NAN);
    if f == 0.0 {
        "0".to_string()
    } else if !f.is_finite() {
        f.to_string()
    } else if f.abs() >= 1e21 || f.abs() < 1e-6 {
        // Exponent form, signed the way a JSON client prints it: `1e+21`.
        let formatted = format!("{f:e}");
        match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        }
    } else if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Returns the value stored under `key` unless it is missing or `null`.
#[must_use]
pub fn provided<'a>(payload: &'a Payload, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|v| !v.is_null())
}

/// String content of a value, when it is a JSON string.
#[must_use]
pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str()
}

/// Integer reading of a value that already passed a positive-integer check.
///
/// Returns `None` when the decimal form does not fit in an `i32`.
#[must_use]
pub fn as_int(value: &Value) -> Option<i32> {
    stringify(value)?.parse().ok()
}

/// Floating point reading of a numeric or numeric-string value.
#[must_use]
pub fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_present(None));
        assert!(!is_present(Some(&json!(null))));
        assert!(!is_present(Some(&json!(false))));
        assert!(!is_present(Some(&json!(0))));
        assert!(!is_present(Some(&json!(0.0))));
        assert!(!is_present(Some(&json!(""))));
        assert!(is_present(Some(&json!(" "))));
        assert!(is_present(Some(&json!(-1))));
        assert!(is_present(Some(&json!([]))));
    }

    #[test]
    fn test_provided_keeps_falsy_values() {
        let payload = json!({ "duration": 0, "year": null })
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(provided(&payload, "duration"), Some(&json!(0)));
        assert_eq!(present(&payload, "duration"), None);
        assert_eq!(provided(&payload, "year"), None);
        assert_eq!(provided(&payload, "genre"), None);
    }

    #[test]
    fn test_stringify_numbers_like_a_json_client() {
        assert_eq!(stringify(&json!(192)).as_deref(), Some("192"));
        assert_eq!(stringify(&json!(5.0)).as_deref(), Some("5"));
        assert_eq!(stringify(&json!(5.9)).as_deref(), Some("5.9"));
        assert_eq!(stringify(&json!(-0.0)).as_deref(), Some("0"));
        assert_eq!(stringify(&json!("01")).as_deref(), Some("01"));
        assert_eq!(stringify(&json!(true)), None);
        assert_eq!(stringify(&json!(null)), None);
    }

    #[test]
    fn test_stringify_switches_to_exponent_form() {
        assert_eq!(stringify(&json!(1e20)).as_deref(), Some("100000000000000000000"));
        assert_eq!(stringify(&json!(1e21)).as_deref(), Some("1e+21"));
        assert_eq!(stringify(&json!(1.5e21)).as_deref(), Some("1.5e+21"));
        assert_eq!(stringify(&json!(-2e30)).as_deref(), Some("-2e+30"));
        assert_eq!(stringify(&json!(1e-7)).as_deref(), Some("1e-7"));
        assert_eq!(stringify(&json!(0.000_001)).as_deref(), Some("0.000001"));
    }

    #[test]
    fn test_as_int_guards_overflow() {
        assert_eq!(as_int(&json!(42)), Some(42));
        assert_eq!(as_int(&json!("7")), Some(7));
        assert_eq!(as_int(&json!(99_999_999_999_i64)), None);
    }
}
