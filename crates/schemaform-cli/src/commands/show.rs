//! The `show` command.
//!
//! Loads the saved form and prints every field with its label, input type,
//! and current value.

use std::io::Write;

use async_trait::async_trait;
use schemaform_core::FormResult;

use crate::command::{CommandContext, FormCommand};

/// Prints the saved form.
pub struct ShowCommand;

#[async_trait]
impl FormCommand for ShowCommand {
    fn name(&self) -> &'static str {
        "show"
    }

    fn help(&self) -> &'static str {
        "Print every field and its saved value"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        ctx: &CommandContext,
        out: &mut (dyn Write + Send),
    ) -> FormResult<()> {
        let form = ctx.session.mount().await?;

        writeln!(out, "{}", ctx.settings.title)?;
        for field in form.schema() {
            let value = form.value(&field.field).unwrap_or_default();
            writeln!(
                out,
                "  {} [{}, {}]: {value}",
                field.display,
                field.field,
                field.kind.input_type()
            )?;
        }
        Ok(())
    }
}
