//! The input loop and dispatcher.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use persona_console_core::{ParsedLine, RegistryError, TagRegistry, tokenize};
use persona_console_roster::Roster;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandContext, CommandRegistry, Flow};
use crate::commands::register_builtins;
use crate::engine::Logger;
use crate::error::EngineError;
use crate::session::Session;

const INPUT_THREAD: &str = "console-input";

/// Registries, session state and the logger the input loop works with.
///
/// The console is moved onto the input thread by [`spawn`](Console::spawn),
/// so handlers get `&mut` access to the session without locking.
#[derive(Debug)]
pub struct Console {
    commands: CommandRegistry,
    tags: TagRegistry,
    session: Session,
    logger: Logger,
    active: AtomicBool,
}

impl Console {
    /// Creates a console with no commands registered.
    pub fn new(logger: Logger) -> Self {
        Self {
            commands: CommandRegistry::new(),
            tags: TagRegistry::new(),
            session: Session::new(),
            logger,
            active: AtomicBool::new(false),
        }
    }

    /// Creates a console with `help`, `end` and `session` registered.
    ///
    /// # Errors
    ///
    /// Propagates registry failures from the built-in registrations.
    pub fn with_builtins(logger: Logger, roster: Arc<Roster>) -> Result<Self, RegistryError> {
        let mut console = Self::new(logger);
        register_builtins(&mut console.commands, &mut console.tags, roster)?;
        Ok(console)
    }

    /// Adds a command.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        debug!(command = command.name(), "registering command");
        self.commands.register(command)
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Mutable access for registering custom tags and tag sets.
    pub fn tags_mut(&mut self) -> &mut TagRegistry {
        &mut self.tags
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Returns `true` while [`run`](Console::run) is reading input.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Tokenizes and dispatches one input line.
    pub fn execute_line(&mut self, input: &str) -> Flow {
        self.dispatch(&tokenize(input))
    }

    /// Runs the handler for `line`.
    ///
    /// Unknown commands and handler errors are logged as warnings; only a
    /// handler returning [`Flow::Shutdown`] ends the loop.
    pub fn dispatch(&mut self, line: &ParsedLine) -> Flow {
        if line.is_empty() {
            return Flow::Continue;
        }

        let Some(command) = self.commands.get(&line.command) else {
            debug!(command = %line.command, "unknown command");
            self.logger
                .warn(format!("Command '{}' is not implemented", line.command));
            return Flow::Continue;
        };

        debug!(
            command = command.name(),
            args = line.args.len(),
            tags = line.tags.len(),
            "dispatching command"
        );
        let mut ctx = CommandContext {
            logger: &self.logger,
            session: &mut self.session,
            commands: &self.commands,
        };
        match command.execute(&mut ctx, line) {
            Ok(flow) => flow,
            Err(err) => {
                debug!(command = command.name(), error = %err, "command failed");
                self.logger.warn(err.to_string());
                Flow::Continue
            }
        }
    }

    /// Reads lines from `input` until a command shuts the console down.
    ///
    /// End of input behaves like `end`. A read failure is logged and also
    /// ends the loop.
    pub fn run<R: BufRead>(&mut self, mut input: R) {
        self.active.store(true, Ordering::Release);
        info!("input loop started");

        let mut buf = String::new();
        while self.is_active() {
            self.logger.show_prompt();
            buf.clear();
            let read = input.read_line(&mut buf);
            self.logger.input_received();

            let flow = match read {
                Ok(0) => {
                    debug!("end of input");
                    self.execute_line("end")
                }
                Ok(_) => self.execute_line(buf.trim_end_matches(['\r', '\n'])),
                Err(err) => {
                    warn!(error = %err, "failed to read input");
                    self.logger
                        .error_with("Failed to read input", err.to_string());
                    Flow::Shutdown
                }
            };

            if flow == Flow::Shutdown {
                self.active.store(false, Ordering::Release);
            }
        }
        info!("input loop stopped");
    }

    /// Moves the console onto its own input thread.
    ///
    /// Joining the handle returns the console once the loop has stopped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Spawn`] if the thread cannot be created.
    pub fn spawn<R>(mut self, input: R) -> Result<JoinHandle<Console>, EngineError>
    where
        R: BufRead + Send + 'static,
    {
        thread::Builder::new()
            .name(INPUT_THREAD.to_string())
            .spawn(move || {
                self.run(input);
                self
            })
            .map_err(|source| EngineError::Spawn {
                name: INPUT_THREAD,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::AtomicUsize;

    use persona_console_roster::Npc;

    use super::*;
    use crate::command::CommandSpec;
    use crate::engine::LogEngine;
    use crate::output::{RenderOptions, SharedBuffer, Terminal};

    fn engine() -> (LogEngine, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let mut engine = LogEngine::new(Terminal::new(buffer.clone(), RenderOptions::default()));
        engine.start().unwrap();
        (engine, buffer)
    }

    #[test]
    fn test_empty_line_is_ignored() {
        let (mut engine, buffer) = engine();
        let mut console = Console::new(engine.logger());
        assert_eq!(console.execute_line("   "), Flow::Continue);
        engine.stop().unwrap();
        assert!(!buffer.plain_text().contains("->"));
    }

    #[test]
    fn test_unknown_command_runs_nothing() {
        let (mut engine, buffer) = engine();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut console = Console::new(engine.logger());
        console
            .register(Command::from_fn(
                CommandSpec::new("count", "Counts calls", "count"),
                move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Flow::Continue)
                },
            ))
            .unwrap();

        console.execute_line("bogus");
        console.execute_line("COUNT");
        engine.stop().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(
            buffer
                .plain_text()
                .contains("[WARNING] -> Command 'bogus' is not implemented")
        );
    }

    #[test]
    fn test_handler_error_becomes_warning() {
        let (mut engine, buffer) = engine();
        let roster = Arc::new(Roster::new(vec![Npc::new("001", "Mira")], vec![]).unwrap());
        let mut console = Console::with_builtins(engine.logger(), roster).unwrap();

        assert_eq!(console.execute_line("session"), Flow::Continue);
        engine.stop().unwrap();
        assert!(
            buffer
                .plain_text()
                .contains("[WARNING] -> session requires a subcommand")
        );
    }

    #[test]
    fn test_run_stops_on_end() {
        let (mut engine, buffer) = engine();
        let mut console = Console::with_builtins(engine.logger(), Arc::new(Roster::empty())).unwrap();

        console.run(Cursor::new("help\nend\nhelp end\n"));
        assert!(!console.is_active());
        engine.stop().unwrap();

        let text = buffer.plain_text();
        assert_eq!(text.matches("Available commands:").count(), 1);
        assert!(text.contains("-> Shutting down"));
        assert!(!text.contains("Usage: end"));
    }

    #[test]
    fn test_spawned_loop_treats_eof_as_end() {
        let (mut engine, buffer) = engine();
        let console = Console::with_builtins(engine.logger(), Arc::new(Roster::empty())).unwrap();

        let handle = console.spawn(Cursor::new("session info")).unwrap();
        let console = handle.join().unwrap();
        assert!(!console.is_active());
        engine.stop().unwrap();

        let text = buffer.plain_text();
        assert!(text.contains("Session: npc = none, player = none"));
        assert!(text.contains("-> Shutting down"));
    }
}
