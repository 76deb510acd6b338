//! Declarative field schema.
//!
//! A [`Schema`] is the ordered, immutable list of [`FieldSchema`] entries that
//! drives both the rule compiler and the store codec. Each entry's
//! [`FieldKind`] is a closed sum type carrying only the conditions that make
//! sense for that kind, so a money field can never hold a regex.
//!
//! The JSON representation is an array of objects:
//!
//! ```json
//! [
//!   { "entity": "Loan", "display": "Loan Amount", "field": "loanAmount",
//!     "type": "money", "conditions": { "minValue": 1000 } },
//!   { "entity": "Borrower", "display": "Birth Date", "field": "birthDate",
//!     "type": "date" }
//! ]
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use schemaform_core::{FormError, FormResult};

const LOAN_SCHEMA: &str = include_str!("../assets/loan_schema.json");

/// The store sub-document a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Entity {
    /// The loan being applied for.
    Loan,
    /// The person applying.
    Borrower,
}

impl Entity {
    /// Returns the entity's key in the store document.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loan => "Loan",
            Self::Borrower => "Borrower",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled regular expression that keeps its source text.
///
/// Compiling happens when the schema is built or deserialized, so an invalid
/// pattern is a configuration error rather than a failure at rule time.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles `source` into a pattern.
    pub fn new(source: &str) -> FormResult<Self> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| FormError::ConfigurationError(format!("Invalid regex '{source}': {e}")))
    }

    /// Returns the source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns `true` if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Regex::new(&source).map(Self).map_err(serde::de::Error::custom)
    }
}

/// Conditions of a `string` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConditions {
    /// The text must match this pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Pattern>,
}

/// Conditions of a `money` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyConditions {
    /// Smallest accepted amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Largest accepted amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

/// The kind of a field, with the conditions that kind supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text, optionally constrained by a pattern.
    String {
        /// Optional text conditions.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conditions: Option<StringConditions>,
    },
    /// A money amount, optionally bounded.
    Money {
        /// Optional bounds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conditions: Option<MoneyConditions>,
    },
    /// A calendar date entered as `YYYY-MM-DD`.
    Date,
}

impl FieldKind {
    /// An unconstrained text field.
    pub const fn text() -> Self {
        Self::String { conditions: None }
    }

    /// A text field that must match `pattern`.
    pub fn pattern(pattern: &str) -> FormResult<Self> {
        Ok(Self::String {
            conditions: Some(StringConditions {
                regex: Some(Pattern::new(pattern)?),
            }),
        })
    }

    /// A money field with optional bounds.
    pub const fn money(min_value: Option<f64>, max_value: Option<f64>) -> Self {
        if min_value.is_none() && max_value.is_none() {
            Self::Money { conditions: None }
        } else {
            Self::Money {
                conditions: Some(MoneyConditions {
                    min_value,
                    max_value,
                }),
            }
        }
    }

    /// Returns the lowercase type name used in the schema file.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Money { .. } => "money",
            Self::Date => "date",
        }
    }

    /// Returns the HTML input type used to edit this kind.
    pub const fn input_type(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::String { .. } | Self::Money { .. } => "text",
        }
    }
}

/// Schema of a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// The store sub-document this field is saved under.
    pub entity: Entity,
    /// Human-readable label.
    pub display: String,
    /// Unique key, used both as form-value key and store key.
    pub field: String,
    /// Kind and kind-specific conditions.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldSchema {
    /// Creates a field schema.
    pub fn new(
        entity: Entity,
        field: impl Into<String>,
        display: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self {
            entity,
            display: display.into(),
            field: field.into(),
            kind,
        }
    }
}

/// An ordered list of field schemas with unique field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSchema>", into = "Vec<FieldSchema>")]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    /// Creates a schema, rejecting duplicate field names.
    pub fn new(fields: Vec<FieldSchema>) -> FormResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.field.as_str()) {
                return Err(FormError::ConfigurationError(format!(
                    "Duplicate field '{}' in schema",
                    field.field
                )));
            }
        }
        Ok(Self { fields })
    }

    /// Parses a schema from its JSON representation.
    pub fn from_json_str(json: &str) -> FormResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| FormError::ConfigurationError(format!("Invalid schema: {e}")))
    }

    /// Reads and parses a JSON schema file.
    pub fn from_file(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FormError::ConfigurationError(format!(
                "Failed to read schema file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// The bundled loan application schema.
    pub fn loan() -> Self {
        Self::from_json_str(LOAN_SCHEMA).expect("bundled loan schema is valid")
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Iterates over the fields in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.fields.iter()
    }

    /// Looks up a field by name.
    pub fn get(&self, field: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Returns the entities referenced by the schema.
    pub fn entities(&self) -> BTreeSet<Entity> {
        self.fields.iter().map(|f| f.entity).collect()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<FieldSchema>> for Schema {
    type Error = FormError;

    fn try_from(fields: Vec<FieldSchema>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<Schema> for Vec<FieldSchema> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldSchema;
    type IntoIter = std::slice::Iter<'a, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
