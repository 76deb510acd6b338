//! Loading and saving a form against a store backend.
//!
//! [`FormSession`] ties a schema to one key of a [`StoreBackend`]. It builds
//! the form from the saved document and writes the document back after every
//! successful blur.

use std::sync::Arc;

use tracing::Instrument;

use schemaform_core::logging::store_span;
use schemaform_core::settings::DEFAULT_STORE_KEY;
use schemaform_core::{FormError, FormResult, ValidationError};

use crate::codec::{deserialize, serialize, FormValues, InitialValues, StoreDocument};
use crate::form::SchemaForm;
use crate::schema::Schema;
use crate::store::StoreBackend;

/// A schema bound to one key of a store backend.
#[derive(Debug)]
pub struct FormSession<B: StoreBackend> {
    schema: Arc<Schema>,
    backend: B,
    key: String,
}

impl<B: StoreBackend> FormSession<B> {
    /// Creates a session saving under `key`.
    pub fn new(schema: Arc<Schema>, backend: B, key: impl Into<String>) -> Self {
        Self {
            schema,
            backend,
            key: key.into(),
        }
    }

    /// Creates a session saving under the default `form-data` key.
    pub fn with_default_key(schema: Arc<Schema>, backend: B) -> Self {
        Self::new(schema, backend, DEFAULT_STORE_KEY)
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the store key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the current document.
    ///
    /// Returns `None` when nothing is saved or the saved blob is malformed.
    pub async fn load_document(&self) -> FormResult<Option<StoreDocument>> {
        let Some(raw) = self.backend.get(&self.key).await? else {
            return Ok(None);
        };
        match StoreDocument::parse(&raw) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                tracing::warn!(error = %e, "saved store data is malformed and will be replaced");
                Ok(None)
            }
        }
    }

    /// Reads the initial input text of every field.
    ///
    /// Returns `None` when nothing is saved or the saved blob is malformed.
    pub async fn load_store(&self) -> FormResult<Option<InitialValues>> {
        let raw = self
            .backend
            .get(&self.key)
            .instrument(store_span(&self.key))
            .await?;
        Ok(raw.and_then(|raw| deserialize(&raw, &self.schema)))
    }

    /// Merges `values` into the saved document and writes it back.
    ///
    /// Returns the blob that was written.
    pub async fn save_to_store(&self, values: &FormValues) -> FormResult<String> {
        async {
            let current = self.load_document().await?;
            let data = serialize(values, current.as_ref(), &self.schema)?;
            self.backend.set(&self.key, data.clone()).await?;
            tracing::info!(data = %data, "saved form data");
            Ok::<_, FormError>(data)
        }
        .instrument(store_span(&self.key))
        .await
    }

    /// Writes an empty document, discarding everything saved.
    pub async fn reset(&self) -> FormResult<()> {
        let data = StoreDocument::new().to_json_string()?;
        self.backend.set(&self.key, data).await?;
        tracing::info!(key = %self.key, "store reset");
        Ok(())
    }

    /// Builds a form initialised from the saved document.
    pub async fn mount(&self) -> FormResult<SchemaForm> {
        let initial = self.load_store().await?;
        Ok(SchemaForm::new(Arc::clone(&self.schema)).with_initial(initial))
    }

    /// Blurs `field` and, when it passes validation, saves the valid values.
    ///
    /// Returns the field's error, if any.
    pub async fn blur(
        &self,
        form: &mut SchemaForm,
        field: &str,
    ) -> FormResult<Option<ValidationError>> {
        let error = form.blur(field)?;
        if error.is_none() {
            self.save_to_store(&form.valid_values()).await?;
        }
        Ok(error)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value as JsonValue};

    use super::*;
    use crate::store::InMemoryStore;

    fn session() -> FormSession<InMemoryStore> {
        FormSession::with_default_key(Arc::new(Schema::loan()), InMemoryStore::new())
    }

    async fn saved(session: &FormSession<InMemoryStore>) -> JsonValue {
        let raw = session.backend().get(session.key()).await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_load_store_empty() {
        let session = session();
        assert_eq!(session.key(), "form-data");
        assert!(session.load_store().await.unwrap().is_none());
        assert!(session.load_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_store_malformed() {
        let session = session();
        session
            .backend()
            .set("form-data", "non-json format".to_string())
            .await
            .unwrap();
        assert!(session.load_store().await.unwrap().is_none());
        assert!(session.load_document().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_malformed_blob() {
        let session = session();
        session
            .backend()
            .set("form-data", "non-json format".to_string())
            .await
            .unwrap();
        session.save_to_store(&FormValues::new()).await.unwrap();
        assert_eq!(saved(&session).await["Loan"]["loanAmount"], JsonValue::Null);
    }

    #[tokio::test]
    async fn test_blur_saves_only_when_field_is_valid() {
        let session = session();
        let mut form = session.mount().await.unwrap();

        form.set_value("loanAmount", "11111").unwrap();
        assert!(session.blur(&mut form, "loanAmount").await.unwrap().is_none());
        assert_eq!(saved(&session).await["Loan"]["loanAmount"], json!(11111));

        form.set_value("loanAmount", "123").unwrap();
        let err = session.blur(&mut form, "loanAmount").await.unwrap().unwrap();
        assert_eq!(err.message, "Must be no less than $1000");
        assert_eq!(saved(&session).await["Loan"]["loanAmount"], json!(11111));
    }

    #[tokio::test]
    async fn test_invalid_field_keeps_last_valid_value() {
        let session = session();
        let mut form = session.mount().await.unwrap();

        form.set_value("loanAmount", "11111").unwrap();
        session.blur(&mut form, "loanAmount").await.unwrap();
        form.set_value("loanAmount", "abc").unwrap();
        form.set_value("firstName", "Jon").unwrap();
        assert!(session.blur(&mut form, "firstName").await.unwrap().is_none());

        let document = saved(&session).await;
        assert_eq!(document["Loan"]["loanAmount"], json!(11111));
        assert_eq!(document["Borrower"]["firstName"], json!("Jon"));
    }

    #[tokio::test]
    async fn test_mount_restores_saved_values() {
        let session = session();
        let mut form = session.mount().await.unwrap();
        form.set_value("birthDate", "2022-12-11").unwrap();
        session.blur(&mut form, "birthDate").await.unwrap();

        let form = session.mount().await.unwrap();
        assert_eq!(form.value("birthDate"), Some("2022-12-11"));
        assert_eq!(form.value("loanAmount"), Some(""));
    }

    #[tokio::test]
    async fn test_reset() {
        let session = session();
        session.save_to_store(&FormValues::new()).await.unwrap();
        session.reset().await.unwrap();
        assert_eq!(saved(&session).await, json!({}));
        let initial = session.load_store().await.unwrap().unwrap();
        assert!(initial.values().all(String::is_empty));
    }

    #[tokio::test]
    async fn test_blur_unknown_field() {
        let session = session();
        let mut form = session.mount().await.unwrap();
        assert!(session.blur(&mut form, "nickname").await.is_err());
        assert!(session.backend().get("form-data").await.unwrap().is_none());
    }
}
