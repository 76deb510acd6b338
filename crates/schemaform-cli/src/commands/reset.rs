//! The `reset` command.
//!
//! Replaces the saved document with an empty one.

use std::io::Write;

use async_trait::async_trait;
use schemaform_core::FormResult;

use crate::command::{CommandContext, FormCommand};

/// Discards everything saved under the store key.
pub struct ResetCommand;

#[async_trait]
impl FormCommand for ResetCommand {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn help(&self) -> &'static str {
        "Discard the saved form data"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        ctx: &CommandContext,
        out: &mut (dyn Write + Send),
    ) -> FormResult<()> {
        ctx.session.reset().await?;
        writeln!(out, "Cleared '{}'", ctx.session.key())?;
        Ok(())
    }
}
