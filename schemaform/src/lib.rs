//! # schemaform
//!
//! Schema-driven forms with a validated, persisted store document.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `schemaform` to get everything, or on the individual
//! crates for finer-grained control.

/// Errors, settings, and logging.
pub use schemaform_core as core;

/// Schema, coercion, validation rules, store codec, form, and session.
pub use schemaform_forms as forms;

/// The command framework behind the `schemaform` binary.
#[cfg(feature = "cli")]
pub use schemaform_cli as cli;

/// The prelude: the types most programs need.
///
/// ```rust
/// use schemaform::prelude::*;
///
/// let schema = Schema::loan();
/// let rules = compile_rules(&schema);
/// assert_eq!(rules.len(), schema.len());
/// ```
pub mod prelude {
    pub use schemaform_core::{FormError, FormResult, FormSettings, ValidationError};
    pub use schemaform_forms::{
        compile_rule, compile_rules, deserialize, serialize, Entity, FieldKind, FieldSchema,
        FileStore, FormSession, FormValues, InMemoryStore, InitialValues, Schema, SchemaForm,
        StoreBackend, StoreDocument, StoredValue,
    };
}
