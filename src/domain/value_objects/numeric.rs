//! # Numeric Coercion
//!
//! The single place where loosely typed values become finite `f64`s.
//!
//! Statement normalization, assumption overrides and hybrid score inputs all
//! go through these helpers so that `NaN`, infinities, `null`, booleans and
//! unparsable strings are treated identically everywhere.
//!
//! # Examples
//!
//! ```
//! use equity_valuation::domain::value_objects::numeric::{coerce_finite, finite_or};
//! use serde_json::json;
//!
//! assert_eq!(coerce_finite(&json!(12.5)), Some(12.5));
//! assert_eq!(coerce_finite(&json!(" 42 ")), Some(42.0));
//! assert_eq!(coerce_finite(&json!("abc")), None);
//! assert_eq!(coerce_finite(&json!(null)), None);
//!
//! assert_eq!(finite_or(Some(f64::NAN), 0.09), 0.09);
//! assert_eq!(finite_or(Some(0.08), 0.09), 0.08);
//! ```

use serde_json::Value;

/// Coerces a JSON value to a finite number.
///
/// Numbers are accepted when finite. Strings are trimmed and parsed; an
/// empty string is not a number. Every other JSON type yields `None`.
#[must_use]
pub fn coerce_finite(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Coerces an optional JSON value, falling back to `default`.
#[must_use]
pub fn coerce_or(value: Option<&Value>, default: f64) -> f64 {
    value.and_then(coerce_finite).unwrap_or(default)
}

/// Returns `value` when present and finite, otherwise `default`.
#[inline]
#[must_use]
pub fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Returns `Some(value)` only when it is finite.
#[inline]
#[must_use]
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_finite(&json!(0)), Some(0.0));
        assert_eq!(coerce_finite(&json!(-12.75)), Some(-12.75));
        assert_eq!(coerce_finite(&json!(383285000000_u64)), Some(383_285_000_000.0));
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(coerce_finite(&json!("100")), Some(100.0));
        assert_eq!(coerce_finite(&json!("  -3.5\n")), Some(-3.5));
        assert_eq!(coerce_finite(&json!("1e3")), Some(1000.0));
    }

    #[test]
    fn non_numeric_values_are_rejected() {
        assert_eq!(coerce_finite(&json!("")), None);
        assert_eq!(coerce_finite(&json!("   ")), None);
        assert_eq!(coerce_finite(&json!("a")), None);
        assert_eq!(coerce_finite(&json!("NaN")), None);
        assert_eq!(coerce_finite(&json!("inf")), None);
        assert_eq!(coerce_finite(&json!("-infinity")), None);
        assert_eq!(coerce_finite(&json!(null)), None);
        assert_eq!(coerce_finite(&json!(true)), None);
        assert_eq!(coerce_finite(&json!([1])), None);
        assert_eq!(coerce_finite(&json!({"v": 1})), None);
    }

    #[test]
    fn defaults_apply_to_missing_and_non_finite() {
        assert_eq!(coerce_or(None, 7.0), 7.0);
        assert_eq!(coerce_or(Some(&json!("x")), 7.0), 7.0);
        assert_eq!(coerce_or(Some(&json!(3)), 7.0), 3.0);

        assert_eq!(finite_or(None, 1.0), 1.0);
        assert_eq!(finite_or(Some(f64::INFINITY), 1.0), 1.0);
        assert_eq!(finite_or(Some(f64::NEG_INFINITY), 1.0), 1.0);
        assert_eq!(finite_or(Some(2.0), 1.0), 2.0);
    }

    #[test]
    fn finite_filters() {
        assert_eq!(finite(1.5), Some(1.5));
        assert_eq!(finite(f64::NAN), None);
    }
}
