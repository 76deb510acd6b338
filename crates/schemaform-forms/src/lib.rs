//! # schemaform-forms
//!
//! Schema-driven form validation and persistence.
//!
//! A [`Schema`] lists the fields of a form. From it this crate derives:
//!
//! - **Validation rules** ([`rules`]) - one coercion plus ordered validators
//!   per field.
//! - **A store codec** ([`codec`]) - merges validated values into a nested
//!   `entity -> field -> value` document and reads that document back into
//!   input text, recovering from corrupt data field by field.
//!
//! Around that core sit a form adapter ([`SchemaForm`]), key/value
//! persistence backends ([`StoreBackend`]), and [`FormSession`], which loads
//! a form from a backend and saves it on every successful blur.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use schemaform_forms::{FormSession, InMemoryStore, Schema};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let session = FormSession::with_default_key(Arc::new(Schema::loan()), InMemoryStore::new());
//! let mut form = session.mount().await.unwrap();
//!
//! form.set_value("firstName", "Jon").unwrap();
//! assert!(session.blur(&mut form, "firstName").await.unwrap().is_none());
//!
//! let restored = session.mount().await.unwrap();
//! assert_eq!(restored.value("firstName"), Some("Jon"));
//! # }
//! ```

// These clippy lints are intentionally allowed:
// - doc_markdown: field names like `loanAmount` appear unquoted in prose
// - missing_const_for_fn: accessors may gain runtime logic later
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]

pub mod codec;
pub mod coerce;
pub mod form;
pub mod rules;
pub mod schema;
pub mod session;
pub mod store;
pub mod validators;

pub use codec::{deserialize, serialize, FormValues, InitialValues, StoreDocument};
pub use coerce::{Coerced, DateInput, DateParts, MoneyInput, StoredValue};
pub use form::SchemaForm;
pub use rules::{compile_rule, compile_rules, ValidationRule};
pub use schema::{Entity, FieldKind, FieldSchema, Schema};
pub use session::FormSession;
pub use store::{FileStore, InMemoryStore, StoreBackend};
pub use validators::Validator;
