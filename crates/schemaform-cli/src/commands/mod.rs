//! Built-in commands.
//!
//! Each command implements the [`FormCommand`](crate::command::FormCommand)
//! trait.

pub mod reset;
pub mod rules;
pub mod set;
pub mod show;

pub use reset::ResetCommand;
pub use rules::RulesCommand;
pub use set::SetCommand;
pub use show::ShowCommand;

use crate::command::CommandRegistry;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ShowCommand));
    registry.register(Box::new(SetCommand));
    registry.register(Box::new(RulesCommand));
    registry.register(Box::new(ResetCommand));
}
