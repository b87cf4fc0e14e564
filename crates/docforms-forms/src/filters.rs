//! Input filters.
//!
//! Filters transform a submitted value before it is coerced and validated.

use docforms_odm::value::Value;
use serde::Serialize;

/// A transformation applied to submitted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Trim leading and trailing whitespace from strings.
    Strip,
    /// Lowercase strings.
    Lowercase,
    /// Uppercase strings.
    Uppercase,
    /// Replace empty strings with null.
    EmptyToNull,
}

impl Filter {
    /// Applies this filter. Non-string values pass through unchanged.
    pub fn apply(self, value: Value) -> Value {
        let Value::String(s) = value else {
            return value;
        };
        match self {
            Self::Strip => Value::String(s.trim().to_string()),
            Self::Lowercase => Value::String(s.to_lowercase()),
            Self::Uppercase => Value::String(s.to_uppercase()),
            Self::EmptyToNull if s.is_empty() => Value::Null,
            Self::EmptyToNull => Value::String(s),
        }
    }
}

/// Applies filters in order.
pub fn apply_filters(filters: &[Filter], value: Value) -> Value {
    filters.iter().fold(value, |v, f| f.apply(v))
}
