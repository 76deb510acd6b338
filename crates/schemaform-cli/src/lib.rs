//! # schemaform-cli
//!
//! The `schemaform` terminal front end.
//!
//! This crate provides:
//!
//! - **Commands** - a small framework for defining subcommands
//!   ([`FormCommand`], [`CommandRegistry`])
//! - **Built-in commands** - `show`, `set`, `rules`, and `reset`
//!
//! ## Quick Start
//!
//! ```rust
//! use schemaform_cli::command::CommandRegistry;
//! use schemaform_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! assert_eq!(registry.list_commands(), ["reset", "rules", "set", "show"]);
//! ```

// These clippy lints are intentionally allowed:
// - missing_const_for_fn: some functions may gain runtime logic later
// - unused_async: command handlers keep a uniform async signature
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::unused_async)]

pub mod command;
pub mod commands;

pub use command::{CommandContext, CommandRegistry, FormCommand};
