//! Command metadata, handlers and the command registry.
//!
//! A [`Command`] pairs a [`CommandSpec`] (name, description, usage, tag
//! sets) with a [`Handler`]. Closures with the right signature are handlers,
//! so small commands need no dedicated type:
//!
//! ```
//! use persona_console::{Command, CommandSpec, Flow};
//!
//! let ping = Command::from_fn(
//!     CommandSpec::new("ping", "Check the console is alive", "ping"),
//!     |ctx, _line| {
//!         ctx.logger.info("pong");
//!         Ok(Flow::Continue)
//!     },
//! );
//! assert_eq!(ping.name(), "ping");
//! ```

use persona_console_core::{NameRegistry, ParsedLine, RegistryError, TagSet};

use crate::engine::Logger;
use crate::error::CommandError;
use crate::session::Session;

/// What the input loop should do after a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input.
    Continue,
    /// Stop reading input and shut the console down.
    Shutdown,
}

/// Display metadata and declared tag sets of a command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub tag_sets: Vec<TagSet>,
}

impl CommandSpec {
    pub fn new(name: &str, description: &str, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            usage: usage.to_string(),
            tag_sets: Vec::new(),
        }
    }

    /// Declares a tag set the command validates against.
    pub fn with_tag_set(mut self, set: TagSet) -> Self {
        self.tag_sets.push(set);
        self
    }
}

/// Everything a handler may touch while it runs.
pub struct CommandContext<'a> {
    pub logger: &'a Logger,
    pub session: &'a mut Session,
    pub commands: &'a CommandRegistry,
}

/// Behaviour of a command.
///
/// Handlers run synchronously on the input thread and report problems as
/// [`CommandError`]s; the dispatcher turns those into WARNING entries.
pub trait Handler: Send + Sync {
    fn execute(&self, ctx: &mut CommandContext<'_>, line: &ParsedLine) -> Result<Flow, CommandError>;
}

impl<F> Handler for F
where
    F: Fn(&mut CommandContext<'_>, &ParsedLine) -> Result<Flow, CommandError> + Send + Sync,
{
    fn execute(&self, ctx: &mut CommandContext<'_>, line: &ParsedLine) -> Result<Flow, CommandError> {
        self(ctx, line)
    }
}

/// A registered command.
pub struct Command {
    spec: CommandSpec,
    handler: Box<dyn Handler>,
}

impl Command {
    pub fn new(spec: CommandSpec, handler: impl Handler + 'static) -> Self {
        Self {
            spec,
            handler: Box::new(handler),
        }
    }

    /// Builds a command from a closure.
    pub fn from_fn<F>(spec: CommandSpec, handler: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, &ParsedLine) -> Result<Flow, CommandError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(spec, handler)
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn execute(&self, ctx: &mut CommandContext<'_>, line: &ParsedLine) -> Result<Flow, CommandError> {
        self.handler.execute(ctx, line)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Commands keyed by lower-cased name.
///
/// Duplicate names are rejected, matching the tag and tag set registries.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: NameRegistry<Command>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: NameRegistry::new("command"),
        }
    }

    /// Registers a command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if a command with the same name
    /// (ignoring case) exists.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        let name = command.name().to_string();
        self.commands.insert(&name, command)
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Commands sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> Command {
        Command::from_fn(CommandSpec::new(name, "does nothing", name), |_, _| {
            Ok(Flow::Continue)
        })
    }

    #[test]
    fn test_register_rejects_case_insensitive_duplicate() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("Help")).unwrap();
        let err = registry.register(noop("HELP")).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { kind: "command", .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let mut registry = CommandRegistry::new();
        registry.register(noop("session")).unwrap();
        assert_eq!(registry.get("SeSsIoN").unwrap().name(), "session");
        assert!(registry.get("sessions").is_none());
    }

    #[test]
    fn test_iteration_is_sorted_by_name() {
        let mut registry = CommandRegistry::new();
        for name in ["beta", "alpha", "Gamma"] {
            registry.register(noop(name)).unwrap();
        }
        let names: Vec<&str> = registry.iter().map(Command::name).collect();
        assert_eq!(names, vec!["alpha", "beta", "Gamma"]);
    }
}
