//! Core error types for schemaform.
//!
//! [`ValidationError`] is the per-field failure produced by a compiled
//! validation rule. [`FormError`] covers everything else that can go wrong
//! around the core: unknown fields, bad configuration, encoding failures,
//! and persistence I/O.
//!
//! Bad *data* is never an error here. A malformed store blob or a corrupt
//! stored field is recovered by the store codec and only logged.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A single field validation failure.
///
/// The `message` is what a form shows next to the input; the `code`
/// identifies which check failed.
///
/// # Examples
///
/// ```
/// use schemaform_core::error::ValidationError;
///
/// let err = ValidationError::new("Pattern mismatch", "pattern");
/// assert_eq!(err.to_string(), "Pattern mismatch");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The message displayed to the user.
    pub message: String,
    /// A short code identifying the failed check (e.g. "pattern", "min_value").
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

/// The primary error type for schemaform.
#[derive(Error, Debug)]
pub enum FormError {
    /// A field failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// A field name that the schema does not declare.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A configuration value (settings or schema) is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An error occurred while encoding or decoding a document.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The persistence backend failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for FormError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("Number required", "number_required");
        assert_eq!(err.to_string(), "Number required");
        assert_eq!(err.code, "number_required");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Must be no less than $1000", "min_value")
            .with_param("limit", "1000");
        assert_eq!(err.params.get("limit").unwrap(), "1000");
    }

    #[test]
    fn test_form_error_display() {
        let err = FormError::UnknownField("nickname".into());
        assert_eq!(err.to_string(), "Unknown field: nickname");

        let err: FormError = ValidationError::new("Pattern mismatch", "pattern").into();
        assert_eq!(err.to_string(), "Validation error: Pattern mismatch");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormError = io_err.into();
        assert!(matches!(err, FormError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
