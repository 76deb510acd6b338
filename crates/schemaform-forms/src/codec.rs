//! The store codec.
//!
//! [`serialize`] merges validated form values into the prior store document
//! and encodes the result. [`deserialize`] decodes a store document into the
//! initial text of every form input.
//!
//! Neither direction fails on bad data. A blob that is not an object of
//! objects is treated as "no saved data", and a single stored value of the
//! wrong shape only blanks its own field.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use schemaform_core::{FormError, FormResult};

use crate::coerce::{parse_date, parse_money, parse_string, StoredValue};
use crate::schema::{FieldKind, FieldSchema, Schema};

/// The fields of one entity, keyed by field name.
pub type EntityRecord = Map<String, JsonValue>;

/// Validated values to save, keyed by field name.
///
/// A field that is missing from the map has nothing to contribute, usually
/// because it currently fails validation.
pub type FormValues = HashMap<String, StoredValue>;

/// The initial text of every input, keyed by field name.
pub type InitialValues = HashMap<String, String>;

/// The persisted document: entity name to entity record.
///
/// Stored values stay raw JSON until a field parser reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreDocument {
    entities: BTreeMap<String, EntityRecord>,
}

impl StoreDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw blob.
    ///
    /// The top level and every entity must be JSON objects.
    pub fn parse(raw: &str) -> FormResult<Self> {
        serde_json::from_str(raw).map_err(|e| FormError::SerializationError(e.to_string()))
    }

    /// Encodes the document as compact JSON.
    pub fn to_json_string(&self) -> FormResult<String> {
        serde_json::to_string(self).map_err(|e| FormError::SerializationError(e.to_string()))
    }

    /// Returns the record of an entity.
    pub fn entity(&self, entity: &str) -> Option<&EntityRecord> {
        self.entities.get(entity)
    }

    /// Returns the stored value of `field` under `entity`.
    pub fn get(&self, entity: &str, field: &str) -> Option<&JsonValue> {
        self.entity(entity)?.get(field)
    }

    /// Stores a value, creating the entity record on first use.
    pub fn insert(&mut self, entity: &str, field: impl Into<String>, value: JsonValue) {
        self.entities
            .entry(entity.to_string())
            .or_default()
            .insert(field.into(), value);
    }

    /// Iterates over the entity names.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Returns `true` if the document holds no entity.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Resolves the value saved for one field.
///
/// Precedence is the form value, then the value already in the store
/// (including an explicit `null`), then the default of the field's kind:
/// `""` for strings and `null` otherwise.
pub fn pick(
    form_value: Option<&StoredValue>,
    stored: Option<&JsonValue>,
    kind: &FieldKind,
) -> JsonValue {
    match (form_value, stored) {
        (Some(value), _) => JsonValue::from(value),
        (None, Some(stored)) => stored.clone(),
        (None, None) => match kind {
            FieldKind::String { .. } => JsonValue::String(String::new()),
            FieldKind::Money { .. } | FieldKind::Date => JsonValue::Null,
        },
    }
}

/// Builds the next store document from form values and the prior document.
///
/// Every schema field is present in the result. Entities the schema does not
/// mention are dropped.
pub fn merge(
    values: &FormValues,
    current: Option<&StoreDocument>,
    schema: &Schema,
) -> StoreDocument {
    let mut document = StoreDocument::new();
    for field in schema {
        let entity = field.entity.as_str();
        let stored = current.and_then(|doc| doc.get(entity, &field.field));
        let value = pick(values.get(&field.field), stored, &field.kind);
        document.insert(entity, field.field.clone(), value);
    }
    document
}

/// Merges `values` into `current` and encodes the new document.
///
/// # Examples
///
/// ```
/// use schemaform_forms::codec::{serialize, FormValues, StoreDocument};
/// use schemaform_forms::coerce::StoredValue;
/// use schemaform_forms::schema::Schema;
///
/// let schema = Schema::loan();
/// let mut values = FormValues::new();
/// values.insert("firstName".into(), StoredValue::Text("Jon".into()));
///
/// let raw = serialize(&values, None, &schema).unwrap();
/// let doc = StoreDocument::parse(&raw).unwrap();
/// assert_eq!(doc.get("Borrower", "firstName").unwrap(), "Jon");
/// assert!(doc.get("Loan", "loanAmount").unwrap().is_null());
/// ```
pub fn serialize(
    values: &FormValues,
    current: Option<&StoreDocument>,
    schema: &Schema,
) -> FormResult<String> {
    merge(values, current, schema).to_json_string()
}

/// Decodes a raw blob into the initial text of every schema field.
///
/// Returns `None` when the blob is not an object of objects.
pub fn deserialize(raw: &str, schema: &Schema) -> Option<InitialValues> {
    match StoreDocument::parse(raw) {
        Ok(document) => Some(
            schema
                .iter()
                .map(|field| (field.field.clone(), decode_field(&document, field)))
                .collect(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "store data is not json format");
            None
        }
    }
}

/// Renders the stored value of one field as input text.
///
/// A missing entity, or a value its parser rejects, yields `""`.
pub fn decode_field(document: &StoreDocument, field: &FieldSchema) -> String {
    let Some(record) = document.entity(field.entity.as_str()) else {
        return String::new();
    };
    let value = record.get(&field.field);
    let parsed = match field.kind {
        FieldKind::String { .. } => parse_string(value),
        FieldKind::Money { .. } => parse_money(value),
        FieldKind::Date => parse_date(value),
    };
    parsed.unwrap_or_else(|e| {
        tracing::warn!(field = %field.field, error = %e, "stored value ignored");
        String::new()
    })
}
