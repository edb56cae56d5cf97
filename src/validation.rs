//! Field validation and coercion helpers
//!
//! These are pure functions over optional scalar values. Absent fields are
//! passed as `None`, so every helper treats "missing" and "null" alike.

use crate::error::{ErrorCode, SetupError};
use crate::input::ScalarValue;

/// Strings accepted as `true` by [`coerce_bool`], compared case-insensitively
const TRUTHY: [&str; 4] = ["Y", "YES", "TRUE", "1"];

/// True when the value is absent, null, empty, or whitespace-only
pub fn is_blank(value: Option<&ScalarValue>) -> bool {
    match value {
        None | Some(ScalarValue::Null) => true,
        Some(ScalarValue::Text(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Text of a non-blank value, `None` otherwise
pub fn optional_text(value: Option<&ScalarValue>) -> Option<String> {
    if is_blank(value) {
        None
    } else {
        value.map(ScalarValue::as_text)
    }
}

/// Fail with `message` when the value is blank, otherwise return its text
pub fn require_not_blank(value: Option<&ScalarValue>, message: &str) -> Result<String, SetupError> {
    optional_text(value).ok_or_else(|| {
        SetupError::validation_with_code(ErrorCode::VALIDATION_REQUIRED_FIELD, message, None)
    })
}

/// Fail with `message` when `value` is not one of `allowed`
///
/// Comparison is case-sensitive; callers normalise case first.
pub fn require_in_set(allowed: &[&str], value: &str, message: &str) -> Result<(), SetupError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(SetupError::validation_with_code(
            ErrorCode::VALIDATION_NOT_ALLOWED,
            format!("{} (got '{}')", message, value),
            None,
        ))
    }
}

/// Parse a base-10 integer
///
/// Integral numbers and numeric strings are accepted; fractional numbers,
/// booleans and blank values are not.
pub fn coerce_int(value: Option<&ScalarValue>) -> Result<i64, SetupError> {
    let invalid = |shown: String| {
        SetupError::validation_with_code(
            ErrorCode::VALIDATION_INVALID_INTEGER,
            format!("'{}' is not a valid integer", shown),
            None,
        )
    };

    match value {
        Some(ScalarValue::Integer(i)) => Ok(*i),
        Some(ScalarValue::Float(f)) if f.fract() == 0.0 && f.is_finite() => {
            // i64::MAX as f64 rounds up to 2^63, which does not fit
            if *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                Ok(*f as i64)
            } else {
                Err(invalid(f.to_string()))
            }
        }
        Some(ScalarValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(s.clone()).with_source(e)),
        Some(other) => Err(invalid(other.as_text())),
        None => Err(invalid(String::new())),
    }
}

/// Lenient boolean: `true`, `1`, and the strings Y/YES/TRUE/1 in any case
/// are true; everything else, including absence, is false
pub fn coerce_bool(value: Option<&ScalarValue>) -> bool {
    match value {
        Some(ScalarValue::Bool(b)) => *b,
        Some(ScalarValue::Integer(i)) => *i == 1,
        Some(ScalarValue::Text(s)) => {
            let upper = s.trim().to_uppercase();
            TRUTHY.contains(&upper.as_str())
        }
        _ => false,
    }
}
