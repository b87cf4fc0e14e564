//! Core error types for docforms.
//!
//! This module provides the error enum [`DocformsError`] shared by the schema
//! and form crates, and the [`ValidationError`] produced when a form field
//! rejects submitted input.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A single validation failure with a machine-readable code.
///
/// # Examples
///
/// ```
/// use docforms_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
/// assert_eq!(err.code, "required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The human-readable error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "required", "length").
    pub code: String,
    /// Additional parameters providing context for the message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for docforms.
#[derive(Error, Debug)]
pub enum DocformsError {
    /// The value given where a document schema was expected is not one.
    #[error("Type error: {0}")]
    TypeError(String),

    /// Submitted input failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    /// Choices for a reference field could not be loaded.
    #[error("Choice load error: {0}")]
    ChoiceLoadError(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ValidationError> for DocformsError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, DocformsError>`.
pub type DocformsResult<T> = Result<T, DocformsError>;
