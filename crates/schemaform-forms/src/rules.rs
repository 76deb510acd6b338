//! The rule compiler.
//!
//! [`compile_rule`] turns one [`FieldSchema`] into a [`ValidationRule`]: a
//! coercion step that maps input text to a [`Coerced`] value, followed by an
//! ordered list of validators. The first failing validator wins.
//!
//! | kind     | coercion        | validators                                   |
//! |----------|-----------------|----------------------------------------------|
//! | `string` | identity        | pattern (when `conditions.regex` is set)     |
//! | `money`  | [`format_money`]| number required, then min, then max         |
//! | `date`   | [`format_date`] | none                                         |

use std::fmt;

use schemaform_core::ValidationError;

use crate::coerce::{format_date, format_money, Coerced};
use crate::schema::{FieldKind, FieldSchema, MoneyConditions, Schema, StringConditions};
use crate::validators::{
    MaxValueValidator, MinValueValidator, NumberRequiredValidator, PatternValidator, Validator,
};

/// Maps the raw text of an input to its coerced value.
pub type Coercion = fn(&str) -> Coerced;

/// The compiled validation rule of a single field.
pub struct ValidationRule {
    /// The field this rule belongs to.
    pub field: String,
    /// Applied to the raw text before any validator runs.
    pub coercion: Coercion,
    /// Checked in order; the first failure is reported.
    pub validators: Vec<Box<dyn Validator>>,
}

impl ValidationRule {
    /// Coerces raw input text without validating it.
    pub fn coerce(&self, raw: &str) -> Coerced {
        (self.coercion)(raw)
    }

    /// Coerces `raw` and runs the validators.
    ///
    /// Returns the coerced value when every validator passes, otherwise the
    /// error of the first one that fails.
    pub fn validate(&self, raw: &str) -> Result<Coerced, ValidationError> {
        let value = self.coerce(raw);
        for validator in &self.validators {
            validator.validate(&value)?;
        }
        Ok(value)
    }

    /// Returns the names of the validators, in evaluation order.
    pub fn validator_names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.name()).collect()
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("field", &self.field)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

/// Compiles the validation rule of one field.
///
/// Never fails: every condition was checked when the schema was built.
pub fn compile_rule(field: &FieldSchema) -> ValidationRule {
    let (coercion, validators): (Coercion, Vec<Box<dyn Validator>>) = match &field.kind {
        FieldKind::String { conditions } => (coerce_text, string_validators(conditions.as_ref())),
        FieldKind::Money { conditions } => (coerce_money, money_validators(conditions.as_ref())),
        FieldKind::Date => (coerce_date, Vec::new()),
    };

    ValidationRule {
        field: field.field.clone(),
        coercion,
        validators,
    }
}

/// Compiles the rules of every field, in schema order.
pub fn compile_rules(schema: &Schema) -> Vec<ValidationRule> {
    schema.iter().map(compile_rule).collect()
}

fn string_validators(conditions: Option<&StringConditions>) -> Vec<Box<dyn Validator>> {
    conditions
        .and_then(|c| c.regex.clone())
        .map(|pattern| Box::new(PatternValidator::new(pattern)) as Box<dyn Validator>)
        .into_iter()
        .collect()
}

fn money_validators(conditions: Option<&MoneyConditions>) -> Vec<Box<dyn Validator>> {
    let mut validators: Vec<Box<dyn Validator>> = vec![Box::new(NumberRequiredValidator)];
    if let Some(conditions) = conditions {
        if let Some(min) = conditions.min_value {
            validators.push(Box::new(MinValueValidator::new(min)));
        }
        if let Some(max) = conditions.max_value {
            validators.push(Box::new(MaxValueValidator::new(max)));
        }
    }
    validators
}

fn coerce_text(raw: &str) -> Coerced {
    Coerced::Text(raw.to_string())
}

fn coerce_money(raw: &str) -> Coerced {
    Coerced::Money(format_money(raw))
}

fn coerce_date(raw: &str) -> Coerced {
    Coerced::Date(format_date(raw))
}
