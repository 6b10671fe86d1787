//! Interactive command console with a concurrent log/progress renderer.
//!
//! Three pieces cooperate:
//!
//! - [`LogEngine`] owns a single consumer thread that renders queued
//!   [`LogEntry`]s in order and hands the terminal to a live [`Progress`]
//!   while it runs.
//! - [`Console`] reads lines, tokenizes them with
//!   [`persona_console_core::tokenize`] and dispatches to registered
//!   [`Command`]s.
//! - Built-in commands (`help`, `end`, `session`) come from
//!   [`Console::with_builtins`].
//!
//! # Quick start
//!
//! ```no_run
//! use std::io;
//! use std::sync::Arc;
//!
//! use persona_console::{Console, LogEngine, RenderOptions, Terminal};
//! use persona_console_roster::Roster;
//!
//! let mut engine = LogEngine::new(Terminal::stdout(RenderOptions::default()));
//! engine.start().unwrap();
//!
//! let console = Console::with_builtins(engine.logger(), Arc::new(Roster::empty())).unwrap();
//! let input = console.spawn(io::BufReader::new(io::stdin())).unwrap();
//! input.join().unwrap();
//! engine.stop().unwrap();
//! ```

mod command;
pub mod commands;
mod console;
mod engine;
mod error;
mod log;
mod output;
mod progress;
mod session;

pub use command::{Command, CommandContext, CommandRegistry, CommandSpec, Flow, Handler};
pub use console::Console;
pub use engine::{EngineState, LogEngine, Logger};
pub use error::{CommandError, EngineError};
pub use log::{LogEntry, LogKind, TIMESTAMP_FORMAT};
pub use output::{RenderOptions, SharedBuffer, Terminal, strip_ansi};
pub use progress::Progress;
pub use session::Session;
