//! Error types for command execution and the log engine.

use persona_console_core::{TagError, ValidationError};
use thiserror::Error;

/// Errors a command handler reports back to the dispatcher.
///
/// The dispatcher renders every variant as a WARNING entry; none of them
/// stop the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Tag usage violated a tag set's inclusivity rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A tag value could not be resolved.
    #[error(transparent)]
    Tag(#[from] TagError),

    /// The command needs a subcommand and none was given.
    #[error("{command} requires a subcommand. Usage: {usage}")]
    MissingSubcommand {
        /// Command name.
        command: String,
        /// Usage text of the command.
        usage: String,
    },

    /// The subcommand is not one the command understands.
    #[error("unknown {command} subcommand '{name}'. Usage: {usage}")]
    UnknownSubcommand {
        /// Command name.
        command: String,
        /// The rejected subcommand.
        name: String,
        /// Usage text of the command.
        usage: String,
    },
}

/// Errors raised by the log engine and input thread lifecycles.
#[derive(Debug, Error)]
pub enum EngineError {
    /// `start()` was called on an engine that already owns a consumer.
    #[error("log engine already started")]
    AlreadyStarted,

    /// A worker thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked before it could be joined.
    #[error("{0} thread panicked")]
    Panicked(&'static str),
}
