//! The `schemaform` binary.

use std::path::PathBuf;
use std::process::ExitCode;

use schemaform_cli::command::{CommandContext, CommandRegistry};
use schemaform_cli::commands::register_builtin_commands;
use schemaform_core::logging::setup_logging;
use schemaform_core::settings_loader;
use schemaform_core::FormResult;

#[tokio::main]
async fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    match run(&registry, &matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(registry: &CommandRegistry, matches: &clap::ArgMatches) -> FormResult<()> {
    let settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => settings_loader::from_file_with_env(path)?,
        None => settings_loader::from_env(),
    };
    setup_logging(&settings);

    let ctx = CommandContext::from_settings(settings)?;
    let mut stdout = std::io::stdout();
    registry.execute(matches, &ctx, &mut stdout).await
}
