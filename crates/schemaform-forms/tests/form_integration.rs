//! Integration tests for the form -> session -> store pipeline.
//!
//! These tests drive a loan form the way a user would: type into an input,
//! leave it, and check both the messages shown and the document saved.
//! 1. Field validation on blur
//! 2. Saving to the store
//! 3. Loading from the store
//! 4. File-backed persistence

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use schemaform_forms::{FileStore, FormSession, InMemoryStore, Schema, SchemaForm, StoreBackend};

// ============================================================================
// Shared helpers
// ============================================================================

const KEY: &str = "form-data";

fn loan_session() -> FormSession<InMemoryStore> {
    FormSession::with_default_key(Arc::new(Schema::loan()), InMemoryStore::new())
}

fn no_validation_schema() -> Schema {
    Schema::from_json_str(include_str!("fixtures/no_validation.json")).unwrap()
}

async fn input_and_blur<B: StoreBackend>(
    session: &FormSession<B>,
    form: &mut SchemaForm,
    field: &str,
    value: &str,
) -> Option<String> {
    form.set_value(field, value).unwrap();
    session
        .blur(form, field)
        .await
        .unwrap()
        .map(|err| err.message)
}

async fn saved<B: StoreBackend>(session: &FormSession<B>) -> Option<JsonValue> {
    let raw = session.backend().get(KEY).await.unwrap()?;
    Some(serde_json::from_str(&raw).unwrap())
}

async fn mount_with<B: StoreBackend>(session: &FormSession<B>, blob: &str) -> SchemaForm {
    session.backend().set(KEY, blob.to_string()).await.unwrap();
    session.mount().await.unwrap()
}

fn assert_values(form: &SchemaForm, expected: [(&str, &str); 5]) {
    for (field, value) in expected {
        assert_eq!(form.value(field), Some(value), "{field}");
    }
}

// ============================================================================
// 1. Field validation on blur
// ============================================================================

#[tokio::test]
async fn test_all_schema_fields_are_rendered() {
    let session = loan_session();
    let form = session.mount().await.unwrap();
    for field in ["loanAmount", "downPaymentAmount", "firstName", "lastName", "birthDate"] {
        assert_eq!(form.value(field), Some(""), "{field}");
    }
}

#[tokio::test]
async fn test_money_not_a_number() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();

    let err = input_and_blur(&session, &mut form, "loanAmount", "text is not number").await;
    assert_eq!(err.as_deref(), Some("Number required"));
    assert!(saved(&session).await.is_none());
}

#[tokio::test]
async fn test_money_below_min() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();

    let err = input_and_blur(&session, &mut form, "loanAmount", "123").await;
    assert_eq!(err.as_deref(), Some("Must be no less than $1000"));
    assert!(saved(&session).await.is_none());
}

#[tokio::test]
async fn test_money_above_max() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();

    let err = input_and_blur(&session, &mut form, "loanAmount", "99999999999").await;
    assert_eq!(err.as_deref(), Some("Must be no greater than $99999999"));
    assert!(saved(&session).await.is_none());
}

#[tokio::test]
async fn test_string_pattern_mismatch() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();

    let err = input_and_blur(&session, &mut form, "firstName", "invalid pattern 123").await;
    assert_eq!(err.as_deref(), Some("Pattern mismatch"));
    assert_eq!(form.error("firstName").unwrap().code, "pattern");
    assert!(saved(&session).await.is_none());
}

#[tokio::test]
async fn test_schema_without_conditions() {
    let schema = Arc::new(no_validation_schema());
    let session = FormSession::with_default_key(schema, InMemoryStore::new());
    let mut form = session.mount().await.unwrap();

    assert!(input_and_blur(&session, &mut form, "firstName", "number 123 is acceptable")
        .await
        .is_none());
    assert!(input_and_blur(&session, &mut form, "loanAmount", "123").await.is_none());

    let data = saved(&session).await.unwrap();
    assert_eq!(data["Borrower"]["firstName"], json!("number 123 is acceptable"));
    assert_eq!(data["Loan"]["loanAmount"], json!(123));
}

// ============================================================================
// 2. Saving to the store
// ============================================================================

#[tokio::test]
async fn test_empty_money_and_date_save_as_null() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();

    input_and_blur(&session, &mut form, "loanAmount", "").await;
    input_and_blur(&session, &mut form, "birthDate", "").await;

    let data = saved(&session).await.unwrap();
    assert_eq!(data["Loan"]["loanAmount"], JsonValue::Null);
    assert_eq!(data["Borrower"]["birthDate"], JsonValue::Null);
}

#[tokio::test]
async fn test_invalid_input_keeps_stored_value() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();
    session
        .backend()
        .set(KEY, r#"{"Loan":{"loanAmount":"11111"}}"#.to_string())
        .await
        .unwrap();

    let err = input_and_blur(&session, &mut form, "loanAmount", "invalid string input").await;
    assert_eq!(err.as_deref(), Some("Number required"));

    assert!(input_and_blur(&session, &mut form, "firstName", "foo").await.is_none());

    let data = saved(&session).await.unwrap();
    assert_eq!(data["Loan"]["loanAmount"], json!("11111"));
    assert_eq!(data["Borrower"]["firstName"], json!("foo"));
}

#[tokio::test]
async fn test_invalid_input_without_stored_value_saves_blank() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();

    let err = input_and_blur(&session, &mut form, "firstName", "invalid name 123").await;
    assert_eq!(err.as_deref(), Some("Pattern mismatch"));

    assert!(input_and_blur(&session, &mut form, "loanAmount", "111111").await.is_none());

    let data = saved(&session).await.unwrap();
    assert_eq!(data["Loan"]["loanAmount"], json!(111_111));
    assert_eq!(data["Loan"]["downPaymentAmount"], JsonValue::Null);
    assert_eq!(data["Borrower"]["firstName"], json!(""));
}

#[tokio::test]
async fn test_save_on_blur() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();

    input_and_blur(&session, &mut form, "loanAmount", "11111").await;
    input_and_blur(&session, &mut form, "firstName", "foo").await;
    input_and_blur(&session, &mut form, "lastName", "bar").await;
    input_and_blur(&session, &mut form, "birthDate", "2022-12-11").await;

    let data = saved(&session).await.unwrap();
    assert_eq!(
        data,
        json!({
            "Loan": {"loanAmount": 11111, "downPaymentAmount": null},
            "Borrower": {
                "firstName": "foo",
                "lastName": "bar",
                "birthDate": {"year": 2022, "month": 12, "day": 11}
            }
        })
    );
}

#[tokio::test]
async fn test_save_returns_written_blob() {
    let session = loan_session();
    let form = session.mount().await.unwrap();
    let blob = session.save_to_store(&form.valid_values()).await.unwrap();
    assert_eq!(
        session.backend().get(KEY).await.unwrap().as_deref(),
        Some(blob.as_str())
    );
}

// ============================================================================
// 3. Loading from the store
// ============================================================================

#[tokio::test]
async fn test_load_saved_values() {
    let session = loan_session();
    let mut form = session.mount().await.unwrap();
    input_and_blur(&session, &mut form, "loanAmount", "11111").await;
    input_and_blur(&session, &mut form, "firstName", "foo").await;
    input_and_blur(&session, &mut form, "lastName", "bar").await;
    input_and_blur(&session, &mut form, "birthDate", "2022-12-11").await;

    let form = session.mount().await.unwrap();
    assert_values(
        &form,
        [
            ("loanAmount", "11111"),
            ("downPaymentAmount", ""),
            ("firstName", "foo"),
            ("lastName", "bar"),
            ("birthDate", "2022-12-11"),
        ],
    );
}

#[tokio::test]
async fn test_load_empty_store() {
    let session = loan_session();
    let form = session.mount().await.unwrap();
    assert!(form.values().values().all(String::is_empty));
}

#[tokio::test]
async fn test_load_with_missing_fields() {
    let session = loan_session();
    let form = mount_with(
        &session,
        r#"{"Loan":{"loanAmount":200000},"Borrower":{"lastName":"Jon"}}"#,
    )
    .await;
    assert_values(
        &form,
        [
            ("loanAmount", "200000"),
            ("downPaymentAmount", ""),
            ("firstName", ""),
            ("lastName", "Jon"),
            ("birthDate", ""),
        ],
    );
}

#[tokio::test]
async fn test_load_with_missing_entity() {
    let session = loan_session();
    let form = mount_with(&session, r#"{"Borrower":{"lastName":"Jon"}}"#).await;
    assert_values(
        &form,
        [
            ("loanAmount", ""),
            ("downPaymentAmount", ""),
            ("firstName", ""),
            ("lastName", "Jon"),
            ("birthDate", ""),
        ],
    );
}

#[tokio::test]
async fn test_load_non_json_store() {
    let session = loan_session();
    let form = mount_with(&session, "non-json format").await;
    assert!(form.values().values().all(String::is_empty));
}

#[tokio::test]
async fn test_load_keeps_the_rest_when_a_field_is_invalid() {
    let session = loan_session();
    let form = mount_with(
        &session,
        r#"{"Borrower":{"birthDate":"non-date-format","firstName":"Jon"},"Loan":{"loanAmount":123456}}"#,
    )
    .await;
    assert_values(
        &form,
        [
            ("loanAmount", "123456"),
            ("downPaymentAmount", ""),
            ("firstName", "Jon"),
            ("lastName", ""),
            ("birthDate", ""),
        ],
    );
}

// ============================================================================
// 4. File-backed persistence
// ============================================================================

#[tokio::test]
async fn test_file_store_survives_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let schema = Arc::new(Schema::loan());

    let session = FormSession::new(Arc::clone(&schema), FileStore::new(dir.path()), KEY);
    let mut form = session.mount().await.unwrap();
    input_and_blur(&session, &mut form, "downPaymentAmount", "2500.5").await;
    input_and_blur(&session, &mut form, "lastName", "O'Brien").await;

    let reopened = FormSession::new(schema, FileStore::new(dir.path()), KEY);
    let form = reopened.mount().await.unwrap();
    assert_eq!(form.value("downPaymentAmount"), Some("2500.5"));
    assert_eq!(form.value("lastName"), Some("O'Brien"));
    assert!(dir.path().join("form-data.json").exists());
}

#[tokio::test]
async fn test_file_store_reset() {
    let dir = tempfile::tempdir().unwrap();
    let session = FormSession::new(Arc::new(Schema::loan()), FileStore::new(dir.path()), KEY);
    let mut form = session.mount().await.unwrap();
    input_and_blur(&session, &mut form, "firstName", "Jon").await;

    session.reset().await.unwrap();
    assert_eq!(saved(&session).await, Some(json!({})));
    let form = session.mount().await.unwrap();
    assert_eq!(form.value("firstName"), Some(""));
}
