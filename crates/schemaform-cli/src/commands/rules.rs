//! The `rules` command.
//!
//! Prints the validation rule compiled for each field.

use std::io::Write;

use async_trait::async_trait;
use schemaform_core::FormResult;
use schemaform_forms::compile_rule;

use crate::command::{CommandContext, FormCommand};

/// Lists the compiled validation rules.
pub struct RulesCommand;

#[async_trait]
impl FormCommand for RulesCommand {
    fn name(&self) -> &'static str {
        "rules"
    }

    fn help(&self) -> &'static str {
        "Print the validators compiled for each field"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        ctx: &CommandContext,
        out: &mut (dyn Write + Send),
    ) -> FormResult<()> {
        for field in ctx.session.schema().iter() {
            let rule = compile_rule(field);
            let validators = rule.validator_names();
            let listed = if validators.is_empty() {
                "-".to_string()
            } else {
                validators.join(", ")
            };
            writeln!(out, "{} ({}): {listed}", field.field, field.kind.type_name())?;
        }
        Ok(())
    }
}
