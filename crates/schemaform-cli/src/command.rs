//! Command framework for the `schemaform` binary.
//!
//! This module provides the [`FormCommand`] trait for defining subcommands,
//! [`CommandContext`] holding what every command runs against, and
//! [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use std::io::Write;
//!
//! use async_trait::async_trait;
//! use schemaform_cli::command::{CommandContext, FormCommand};
//! use schemaform_core::FormResult;
//!
//! struct CountCommand;
//!
//! #[async_trait]
//! impl FormCommand for CountCommand {
//!     fn name(&self) -> &'static str { "count" }
//!     fn help(&self) -> &'static str { "Print the number of fields" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         ctx: &CommandContext,
//!         out: &mut (dyn Write + Send),
//!     ) -> FormResult<()> {
//!         writeln!(out, "{}", ctx.session.schema().len())?;
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use schemaform_core::{FormError, FormResult, FormSettings};
use schemaform_forms::{FileStore, FormSession, InMemoryStore, Schema, StoreBackend};

/// A subcommand that can be registered and invoked through the CLI.
#[async_trait]
pub trait FormCommand: Send + Sync {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &'static str;

    /// Returns a short help description for this command.
    fn help(&self) -> &'static str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command, writing its report to `out`.
    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        ctx: &CommandContext,
        out: &mut (dyn Write + Send),
    ) -> FormResult<()>;
}

/// Everything a command runs against: the settings and a session bound to
/// the configured store.
pub struct CommandContext {
    /// The loaded settings.
    pub settings: FormSettings,
    /// The session saving under `settings.store_key`.
    pub session: FormSession<Arc<dyn StoreBackend>>,
}

impl CommandContext {
    /// Builds a context from settings.
    ///
    /// The schema comes from `schema_path` when set, otherwise the bundled
    /// loan schema is used. A `store_dir` selects the file store; without
    /// one the store lives in memory for the duration of the process.
    pub fn from_settings(settings: FormSettings) -> FormResult<Self> {
        let schema = match &settings.schema_path {
            Some(path) => Schema::from_file(path)?,
            None => Schema::loan(),
        };
        let backend: Arc<dyn StoreBackend> = match &settings.store_dir {
            Some(dir) => Arc::new(FileStore::new(dir)),
            None => Arc::new(InMemoryStore::new()),
        };
        Ok(Self::new(settings, Arc::new(schema), backend))
    }

    /// Builds a context from its parts.
    pub fn new(
        settings: FormSettings,
        schema: Arc<Schema>,
        backend: Arc<dyn StoreBackend>,
    ) -> Self {
        let session = FormSession::new(schema, backend, settings.store_key.clone());
        Self { settings, session }
    }
}

/// A registry of commands.
///
/// Commands are registered by name and can be looked up, listed, or executed.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn FormCommand>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command, replacing one with the same name.
    pub fn register(&mut self, command: Box<dyn FormCommand>) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// Returns the command with the given name, if registered.
    pub fn get(&self, name: &str) -> Option<&dyn FormCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns a sorted list of all registered command names.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with every registered subcommand
    /// and the global `--config` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("schemaform")
            .about("Fill in and persist a schema-driven form")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("config")
                    .long("config")
                    .short('c')
                    .global(true)
                    .value_parser(clap::value_parser!(std::path::PathBuf))
                    .help("Settings file (TOML, or JSON when it ends in .json)"),
            );

        let mut entries: Vec<&dyn FormCommand> =
            self.commands.values().map(AsRef::as_ref).collect();
        entries.sort_by_key(|cmd| cmd.name());

        for cmd in entries {
            let subcmd = clap::Command::new(cmd.name()).about(cmd.help());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches to the subcommand named in `matches`.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        ctx: &CommandContext,
        out: &mut (dyn Write + Send),
    ) -> FormResult<()> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            FormError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            FormError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "running command");
        cmd.handle(sub_matches, ctx, out).await
    }
}
