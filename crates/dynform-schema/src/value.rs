//! Coercions from raw input values to the shapes validation rules inspect.
//!
//! Inputs arrive from the presentation layer as JSON values: strings for
//! text-like inputs, booleans for checkboxes, arrays for multi-file inputs,
//! and occasionally numbers from schema defaults. JSON has no "undefined";
//! an absent path and an explicit `null` are both treated as "no value".

use std::borrow::Cow;

use serde_json::Value;

/// True when the value is absent, `null`, an empty string, or an empty array.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Whether a value counts as "filled in" for rules that only apply to
/// non-empty input. `false` and `0` are not filled in.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Text form of a scalar. Arrays, objects and `null` have none, so
/// text-matching rules skip them.
pub fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        _ => None,
    }
}

/// Numeric reading of an input value.
///
/// Strings are trimmed; a whitespace-only string reads as zero; the
/// literals `Infinity`, `+Infinity` and `-Infinity` are accepted. Other
/// alphabetic content (besides an exponent marker) is rejected, as are
/// arrays, objects and missing values. NaN never comes back.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => parse_number_text(s)?,
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!n.is_nan()).then_some(n)
}

fn parse_number_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    match trimmed {
        "" => return Some(0.0),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if trimmed
        .chars()
        .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Value::Null)));
        assert!(is_blank(Some(&json!(""))));
        assert!(is_blank(Some(&json!([]))));
        assert!(!is_blank(Some(&json!(false))));
        assert!(!is_blank(Some(&json!(0))));
        assert!(!is_blank(Some(&json!(" "))));
    }

    #[test]
    fn test_is_present() {
        assert!(!is_present(Some(&json!(false))));
        assert!(!is_present(Some(&json!(0))));
        assert!(!is_present(Some(&json!(""))));
        assert!(is_present(Some(&json!("x"))));
        assert!(is_present(Some(&json!(true))));
        assert!(is_present(Some(&json!([]))));
    }

    #[test]
    fn test_as_number_strings() {
        assert_eq!(as_number(Some(&json!("7"))), Some(7.0));
        assert_eq!(as_number(Some(&json!(" 2.5 "))), Some(2.5));
        assert_eq!(as_number(Some(&json!("1e3"))), Some(1000.0));
        assert_eq!(as_number(Some(&json!("   "))), Some(0.0));
        assert_eq!(as_number(Some(&json!("-Infinity"))), Some(f64::NEG_INFINITY));
        assert_eq!(as_number(Some(&json!("abc"))), None);
        assert_eq!(as_number(Some(&json!("NaN"))), None);
        assert_eq!(as_number(Some(&json!("inf"))), None);
        assert_eq!(as_number(Some(&json!("12px"))), None);
    }

    #[test]
    fn test_as_number_other_values() {
        assert_eq!(as_number(Some(&json!(42))), Some(42.0));
        assert_eq!(as_number(Some(&json!(true))), Some(1.0));
        assert_eq!(as_number(None), None);
        assert_eq!(as_number(Some(&Value::Null)), None);
        assert_eq!(as_number(Some(&json!([1]))), None);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(as_text(&json!("a")).as_deref(), Some("a"));
        assert_eq!(as_text(&json!(5)).as_deref(), Some("5"));
        assert_eq!(as_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(as_text(&json!(["a"])), None);
    }
}
