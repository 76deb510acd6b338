//! The form-binding adapter.
//!
//! [`SchemaForm`] holds the input text of every schema field, validates a
//! field when it loses focus, and keeps validating it on every change after
//! that. It is the piece a host (a terminal front end, a test, a web view)
//! drives to get validation messages and the values that are safe to save.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use schemaform_core::{FormError, FormResult, ValidationError};

use crate::codec::{FormValues, InitialValues};
use crate::rules::{compile_rules, ValidationRule};
use crate::schema::Schema;

/// A form built from a schema.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use schemaform_forms::form::SchemaForm;
/// use schemaform_forms::schema::Schema;
///
/// let mut form = SchemaForm::new(Arc::new(Schema::loan()));
/// form.set_value("loanAmount", "123").unwrap();
/// let err = form.blur("loanAmount").unwrap().unwrap();
/// assert_eq!(err.message, "Must be no less than $1000");
/// ```
#[derive(Debug)]
pub struct SchemaForm {
    schema: Arc<Schema>,
    rules: Vec<ValidationRule>,
    values: HashMap<String, String>,
    errors: HashMap<String, ValidationError>,
    touched: HashSet<String>,
}

impl SchemaForm {
    /// Creates a form with every input blank.
    pub fn new(schema: Arc<Schema>) -> Self {
        let rules = compile_rules(&schema);
        let values = schema
            .iter()
            .map(|f| (f.field.clone(), String::new()))
            .collect();
        Self {
            schema,
            rules,
            values,
            errors: HashMap::new(),
            touched: HashSet::new(),
        }
    }

    /// Sets the initial input text. Names the schema does not declare are
    /// ignored; `None` keeps every input blank.
    #[must_use]
    pub fn with_initial(mut self, initial: Option<InitialValues>) -> Self {
        for (field, text) in initial.into_iter().flatten() {
            if let Some(slot) = self.values.get_mut(&field) {
                *slot = text;
            }
        }
        self
    }

    /// Returns the schema the form was built from.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the compiled rules, in schema order.
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Returns the compiled rule of a field.
    pub fn rule(&self, field: &str) -> Option<&ValidationRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Replaces the input text of a field.
    ///
    /// A field that has already been blurred is validated again right away.
    pub fn set_value(&mut self, field: &str, raw: impl Into<String>) -> FormResult<()> {
        let slot = self
            .values
            .get_mut(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        *slot = raw.into();
        if self.touched.contains(field) {
            self.revalidate(field)?;
        }
        Ok(())
    }

    /// Marks a field as touched and validates it.
    ///
    /// Returns the field's error, if any.
    pub fn blur(&mut self, field: &str) -> FormResult<Option<ValidationError>> {
        self.revalidate(field)?;
        self.touched.insert(field.to_string());
        Ok(self.errors.get(field).cloned())
    }

    /// Returns the current errors, keyed by field name.
    pub fn errors(&self) -> &HashMap<String, ValidationError> {
        &self.errors
    }

    /// Returns the current error of a field.
    pub fn error(&self, field: &str) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    /// Returns `true` if no field currently has an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the input text of a field.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Returns the input text of every field.
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Returns `true` if the field has been blurred at least once.
    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Collects the values that are safe to save.
    ///
    /// Each field whose current text passes its rule contributes its
    /// coerced value. Failing fields are left out, so the store keeps their
    /// last valid value.
    pub fn valid_values(&self) -> FormValues {
        self.rules
            .iter()
            .filter_map(|rule| {
                let raw = self.values.get(&rule.field)?;
                let stored = rule.validate(raw).ok()?.to_stored()?;
                Some((rule.field.clone(), stored))
            })
            .collect()
    }

    fn revalidate(&mut self, field: &str) -> FormResult<()> {
        let rule = self
            .rules
            .iter()
            .find(|r| r.field == field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;
        let raw = self.values.get(field).map_or("", String::as_str);
        match rule.validate(raw) {
            Ok(_) => {
                self.errors.remove(field);
            }
            Err(err) => {
                tracing::debug!(field, code = %err.code, "field failed validation");
                self.errors.insert(field.to_string(), err);
            }
        }
        Ok(())
    }
}
