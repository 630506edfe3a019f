//! `max_tokens` validation
//!
//! The backend rejects requests without a positive token bound, while clients
//! send it as a number, a numeric string, or not at all.

use serde_json::Value;

use super::tools::is_truthy;

/// Bound applied when the client's value is missing or unusable
pub const DEFAULT_MAX_TOKENS: u64 = 1024;

/// Resolve the outbound `max_tokens` for a client-supplied value.
///
/// The value is coerced through a float and truncated toward zero, so `"7.9"`
/// yields `7`. Falsy, unparseable, non-finite, or sub-1 values yield `default`.
pub fn validate_max_tokens(value: Option<&Value>, default: u64) -> u64 {
    let Some(value) = value.filter(|v| is_truthy(v)) else {
        return default;
    };

    match coerce_to_float(value) {
        Some(f) if f.is_finite() && f.trunc() >= 1.0 => f.trunc() as u64,
        _ => default,
    }
}

fn coerce_to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(true) => Some(1.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(value: Value) -> u64 {
        validate_max_tokens(Some(&value), DEFAULT_MAX_TOKENS)
    }

    #[test]
    fn test_unusable_values_get_default() {
        for value in [json!(0), json!(""), json!(null), json!("abc"), json!(-5), json!(0.4)] {
            assert_eq!(check(value.clone()), 1024, "value: {}", value);
        }
        assert_eq!(validate_max_tokens(None, DEFAULT_MAX_TOKENS), 1024);
    }

    #[test]
    fn test_fractional_string_truncates() {
        assert_eq!(check(json!("7.9")), 7);
        assert_eq!(check(json!(" 12 ")), 12);
    }

    #[test]
    fn test_valid_numbers_kept() {
        assert_eq!(check(json!(4096)), 4096);
        assert_eq!(check(json!(2.99)), 2);
        assert_eq!(check(json!("1e3")), 1000);
    }

    #[test]
    fn test_non_numeric_types_get_default() {
        assert_eq!(check(json!("inf")), 1024);
        assert_eq!(check(json!("NaN")), 1024);
        assert_eq!(check(json!([5])), 1024);
        assert_eq!(check(json!({"n": 5})), 1024);
        assert_eq!(check(json!(false)), 1024);
    }

    #[test]
    fn test_custom_default() {
        assert_eq!(validate_max_tokens(Some(&json!("-1")), 256), 256);
    }
}
