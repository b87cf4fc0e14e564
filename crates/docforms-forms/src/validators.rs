//! Form field validators.
//!
//! A [`Validator`] checks one constraint on a submitted (already coerced)
//! [`Value`]. Generated form fields carry a list of them; the form runs them
//! in order and reports every failure.

use docforms_core::ValidationError;
use docforms_odm::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// Sentinel bound meaning "not checked" for [`Validator::Length`].
pub const UNBOUNDED: i64 = -1;

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z]+://(?P<host>[^/:\s]+\.[a-z]{2,63})(?P<port>:[0-9]+)?(?P<path>/\S*)?$")
        .expect("URL pattern is valid")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[^@\s]+@[^@\s.][^@\s]*\.[a-z]{2,}$").expect("email pattern is valid")
});

/// Compiled [`Validator::Regexp`] patterns, keyed by source pattern.
static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the compiled, start-anchored form of `pattern`, compiling it at
/// most once per process. Invalid patterns are not cached.
fn compiled_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(re) = PATTERN_CACHE
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(re.clone());
    }
    let re = Regex::new(&format!("^(?:{pattern})"))?;
    PATTERN_CACHE
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .entry(pattern.to_string())
        .or_insert_with(|| re.clone());
    Ok(re)
}

/// A constraint on a form field's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Validator {
    /// The value must not be empty.
    Required,
    /// The length must lie within `[min, max]`; a bound of [`UNBOUNDED`] is
    /// not checked. Applies to strings (in characters) and bytes.
    Length {
        /// Minimum length, or [`UNBOUNDED`].
        min: i64,
        /// Maximum length, or [`UNBOUNDED`].
        max: i64,
    },
    /// A numeric value must lie within `[min, max]`; absent bounds are not checked.
    NumberRange {
        /// Minimum value.
        min: Option<f64>,
        /// Maximum value.
        max: Option<f64>,
    },
    /// The value must look like an absolute URL.
    Url,
    /// The value must look like an email address.
    Email,
    /// The value must match the pattern at its start.
    Regexp {
        /// The regular expression.
        pattern: String,
    },
}

impl Validator {
    /// Returns the error code reported by this validator.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Length { .. } => "length",
            Self::NumberRange { .. } => "number_range",
            Self::Url => "url",
            Self::Email => "email",
            Self::Regexp { .. } => "regexp",
        }
    }

    /// Validates the given value.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match self {
            Self::Required => {
                if value.is_empty() {
                    return Err(ValidationError::new("This field is required.", self.code()));
                }
                Ok(())
            }
            Self::Length { min, max } => self.validate_length(value, *min, *max),
            Self::NumberRange { min, max } => self.validate_range(value, *min, *max),
            Self::Url => self.validate_pattern(value, &URL_RE, "Invalid URL."),
            Self::Email => self.validate_pattern(value, &EMAIL_RE, "Invalid email address."),
            Self::Regexp { pattern } => {
                let re = compiled_pattern(pattern).map_err(|e| {
                    ValidationError::new(format!("Invalid pattern: {e}"), "invalid_pattern")
                })?;
                self.validate_pattern(value, &re, "Invalid input.")
            }
        }
    }

    fn validate_length(&self, value: &Value, min: i64, max: i64) -> Result<(), ValidationError> {
        let len = match value {
            Value::String(s) => s.chars().count(),
            Value::Bytes(b) => b.len(),
            _ => return Ok(()),
        };
        let len = i64::try_from(len).unwrap_or(i64::MAX);

        let too_short = min != UNBOUNDED && len < min;
        let too_long = max != UNBOUNDED && len > max;
        if !too_short && !too_long {
            return Ok(());
        }

        let message = if max == UNBOUNDED {
            format!("Field must be at least {min} characters long.")
        } else if min == UNBOUNDED {
            format!("Field cannot be longer than {max} characters.")
        } else {
            format!("Field must be between {min} and {max} characters long.")
        };
        Err(ValidationError::new(message, self.code())
            .with_param("min", min.to_string())
            .with_param("max", max.to_string()))
    }

    fn validate_range(
        &self,
        value: &Value,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<(), ValidationError> {
        let in_range = value.as_f64().is_some_and(|n| {
            min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
        });
        if in_range {
            return Ok(());
        }

        let message = match (min, max) {
            (Some(lo), Some(hi)) => format!("Number must be between {lo} and {hi}."),
            (Some(lo), None) => format!("Number must be at least {lo}."),
            (None, Some(hi)) => format!("Number must be at most {hi}."),
            (None, None) => "Not a valid number.".to_string(),
        };
        Err(ValidationError::new(message, self.code()))
    }

    fn validate_pattern(
        &self,
        value: &Value,
        re: &Regex,
        message: &str,
    ) -> Result<(), ValidationError> {
        match value.as_str() {
            Some(s) if re.is_match(s) => Ok(()),
            _ => Err(ValidationError::new(message, self.code())),
        }
    }
}
