//! Built-in commands: `help`, `end` and `session`.

mod end;
mod help;
mod session;

use std::sync::Arc;

use persona_console_core::{RegistryError, TagRegistry};
use persona_console_roster::Roster;

use crate::command::CommandRegistry;

pub use end::end_command;
pub use help::help_command;
pub use session::SessionCommand;

/// Registers every built-in command and the tags they declare.
///
/// # Errors
///
/// Returns [`RegistryError::Duplicate`] if any built-in name is taken.
pub fn register_builtins(
    commands: &mut CommandRegistry,
    tags: &mut TagRegistry,
    roster: Arc<Roster>,
) -> Result<(), RegistryError> {
    commands.register(help_command())?;
    commands.register(end_command())?;
    SessionCommand::new(roster).register(commands, tags)
}
