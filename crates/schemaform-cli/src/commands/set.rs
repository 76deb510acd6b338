//! The `set` command.
//!
//! Applies `field=value` edits in order. Each edit is typed into the field
//! and followed by a blur, so a valid value is saved immediately and an
//! invalid one reports its validation message and leaves the store as is.

use std::io::Write;

use async_trait::async_trait;
use schemaform_core::{FormError, FormResult};

use crate::command::{CommandContext, FormCommand};

/// Edits fields of the saved form.
pub struct SetCommand;

/// Splits a `field=value` edit. The value may be empty or contain `=`.
pub fn parse_edit(edit: &str) -> FormResult<(&str, &str)> {
    match edit.split_once('=') {
        Some((field, value)) if !field.is_empty() => Ok((field, value)),
        _ => Err(FormError::ConfigurationError(format!(
            "Expected FIELD=VALUE, got '{edit}'"
        ))),
    }
}

#[async_trait]
impl FormCommand for SetCommand {
    fn name(&self) -> &'static str {
        "set"
    }

    fn help(&self) -> &'static str {
        "Set fields and save the valid ones"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("edits")
                .value_name("FIELD=VALUE")
                .required(true)
                .num_args(1..)
                .help("Field edits, applied in order"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        ctx: &CommandContext,
        out: &mut (dyn Write + Send),
    ) -> FormResult<()> {
        let edits: Vec<(&str, &str)> = matches
            .get_many::<String>("edits")
            .into_iter()
            .flatten()
            .map(String::as_str)
            .map(parse_edit)
            .collect::<FormResult<_>>()?;

        let mut form = ctx.session.mount().await?;
        for (field, value) in edits {
            form.set_value(field, value)?;
            let status = match ctx.session.blur(&mut form, field).await? {
                Some(err) => err.message,
                None if form.valid_values().contains_key(field) => "saved".to_string(),
                None => "unreadable, left unchanged".to_string(),
            };
            writeln!(out, "{field}: {status}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use schemaform_forms::StoreBackend;
    use serde_json::{json, Value as JsonValue};

    use super::*;
    use crate::commands::test_support::{memory_context, run};

    async fn saved(store: &schemaform_forms::InMemoryStore) -> JsonValue {
        let raw = store.get("form-data").await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(parse_edit("firstName=Jon").unwrap(), ("firstName", "Jon"));
        assert_eq!(parse_edit("loanAmount=").unwrap(), ("loanAmount", ""));
        assert_eq!(parse_edit("note=a=b").unwrap(), ("note", "a=b"));
        assert!(parse_edit("firstName").is_err());
        assert!(parse_edit("=Jon").is_err());
    }

    #[tokio::test]
    async fn test_set_valid_values() {
        let (ctx, store) = memory_context();
        let output = run(
            &ctx,
            &["set", "loanAmount=11111", "firstName=foo", "birthDate=2022-12-11"],
        )
        .await
        .unwrap();
        assert_eq!(output, "loanAmount: saved\nfirstName: saved\nbirthDate: saved\n");

        let data = saved(&store).await;
        assert_eq!(data["Loan"]["loanAmount"], json!(11111));
        assert_eq!(data["Borrower"]["firstName"], json!("foo"));
        assert_eq!(
            data["Borrower"]["birthDate"],
            json!({"year": 2022, "month": 12, "day": 11})
        );
    }

    #[tokio::test]
    async fn test_set_reports_validation_messages() {
        let (ctx, store) = memory_context();
        let output = run(&ctx, &["set", "loanAmount=123", "firstName=invalid pattern 123"])
            .await
            .unwrap();
        assert_eq!(
            output,
            "loanAmount: Must be no less than $1000\nfirstName: Pattern mismatch\n"
        );
        assert!(store.get("form-data").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_keeps_previous_value_on_error() {
        let (ctx, store) = memory_context();
        run(&ctx, &["set", "loanAmount=11111"]).await.unwrap();
        let output = run(&ctx, &["set", "loanAmount=abc", "lastName=bar"])
            .await
            .unwrap();
        assert_eq!(output, "loanAmount: Number required\nlastName: saved\n");

        let data = saved(&store).await;
        assert_eq!(data["Loan"]["loanAmount"], json!(11111));
        assert_eq!(data["Borrower"]["lastName"], json!("bar"));
    }

    #[tokio::test]
    async fn test_set_unreadable_date() {
        let (ctx, _store) = memory_context();
        let output = run(&ctx, &["set", "birthDate=someday"]).await.unwrap();
        assert_eq!(output, "birthDate: unreadable, left unchanged\n");
    }

    #[tokio::test]
    async fn test_set_unknown_field() {
        let (ctx, _store) = memory_context();
        assert!(matches!(
            run(&ctx, &["set", "nickname=J"]).await,
            Err(FormError::UnknownField(_))
        ));
    }
}
