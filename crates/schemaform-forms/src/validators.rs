//! Field validators.
//!
//! A validator inspects one coerced value and reports a [`ValidationError`]
//! when the value breaks its constraint. Validators ignore values of a kind
//! they do not apply to, so a rule can hold any combination of them.

use std::fmt;

use schemaform_core::ValidationError;

use crate::coerce::{Coerced, MoneyInput};
use crate::schema::Pattern;

/// A trait for validating coerced field values.
///
/// # Examples
///
/// ```
/// use schemaform_forms::coerce::{Coerced, MoneyInput};
/// use schemaform_forms::validators::{MinValueValidator, Validator};
///
/// let v = MinValueValidator::new(1000.0);
/// assert!(v.validate(&Coerced::Money(MoneyInput::Amount(1500.0))).is_ok());
/// assert!(v.validate(&Coerced::Money(MoneyInput::Amount(123.0))).is_err());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validates the given value, returning an error if invalid.
    fn validate(&self, value: &Coerced) -> Result<(), ValidationError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

/// Requires non-empty text to match a pattern.
///
/// Empty text is not checked.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    /// The pattern the text must match.
    pub pattern: Pattern,
}

impl PatternValidator {
    /// Creates a new `PatternValidator`.
    pub const fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }
}

impl Validator for PatternValidator {
    fn validate(&self, value: &Coerced) -> Result<(), ValidationError> {
        if let Coerced::Text(text) = value {
            if !text.is_empty() && !self.pattern.is_match(text) {
                return Err(ValidationError::new("Pattern mismatch", "pattern")
                    .with_param("pattern", self.pattern.as_str()));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "PatternValidator"
    }
}

/// Rejects money text that did not coerce to a number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRequiredValidator;

impl Validator for NumberRequiredValidator {
    fn validate(&self, value: &Coerced) -> Result<(), ValidationError> {
        if matches!(value, Coerced::Money(MoneyInput::NotANumber)) {
            return Err(ValidationError::new("Number required", "number_required"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "NumberRequiredValidator"
    }
}

/// Validates that a money amount is not below a minimum.
#[derive(Debug, Clone, Copy)]
pub struct MinValueValidator {
    /// The minimum allowed amount.
    pub min_value: f64,
}

impl MinValueValidator {
    /// Creates a new `MinValueValidator` with the given minimum.
    pub const fn new(min_value: f64) -> Self {
        Self { min_value }
    }
}

impl Validator for MinValueValidator {
    fn validate(&self, value: &Coerced) -> Result<(), ValidationError> {
        if let Coerced::Money(MoneyInput::Amount(n)) = value {
            if *n < self.min_value {
                return Err(ValidationError::new(
                    format!("Must be no less than ${}", self.min_value),
                    "min_value",
                )
                .with_param("limit", self.min_value.to_string()));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "MinValueValidator"
    }
}

/// Validates that a money amount does not exceed a maximum.
#[derive(Debug, Clone, Copy)]
pub struct MaxValueValidator {
    /// The maximum allowed amount.
    pub max_value: f64,
}

impl MaxValueValidator {
    /// Creates a new `MaxValueValidator` with the given maximum.
    pub const fn new(max_value: f64) -> Self {
        Self { max_value }
    }
}

impl Validator for MaxValueValidator {
    fn validate(&self, value: &Coerced) -> Result<(), ValidationError> {
        if let Coerced::Money(MoneyInput::Amount(n)) = value {
            if *n > self.max_value {
                return Err(ValidationError::new(
                    format!("Must be no greater than ${}", self.max_value),
                    "max_value",
                )
                .with_param("limit", self.max_value.to_string()));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "MaxValueValidator"
    }
}
