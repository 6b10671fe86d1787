//! Log engine: one queue, one consumer thread, pause/resume for progress.
//!
//! Producers on any thread push entries through a [`Logger`]. The consumer
//! thread renders them strictly in arrival order. When it reaches a
//! [`Progress`], the engine switches to [`EngineState::Paused`]: the
//! progress owns the terminal and redraws itself in place, and the consumer
//! parks on a condition variable until the progress finishes. Entries that
//! arrive meanwhile stay queued and are rendered after the resume.
//!
//! ```text
//!   Running ──progress reached──▶ Paused
//!      ▲                             │
//!      └──────progress finished──────┘
//!   Running ──stop()──▶ Stopped
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::error::EngineError;
use crate::log::{LogEntry, LogKind};
use crate::output::Terminal;
use crate::progress::{Progress, ProgressInner};

const CONSUMER_THREAD: &str = "console-log";

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// The consumer is dequeuing and rendering entries.
    Running,
    /// A progress owns the terminal; the consumer is parked.
    Paused,
    /// The consumer has exited.
    Stopped,
}

pub(crate) enum Item {
    Entry(Arc<LogEntry>),
    Progress(Arc<ProgressInner>),
    Shutdown,
}

/// State shared by the engine, its loggers and live progress bars.
pub(crate) struct Shared {
    pub(crate) terminal: Arc<Terminal>,
    state: Mutex<EngineState>,
    resumed: Condvar,
    running: AtomicBool,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> EngineState {
        *self.lock_state()
    }

    pub(crate) fn pause(&self) {
        let mut state = self.lock_state();
        if *state == EngineState::Running {
            *state = EngineState::Paused;
        }
    }

    /// Hands the terminal back to the consumer.
    pub(crate) fn resume(&self) {
        let mut state = self.lock_state();
        if *state == EngineState::Paused {
            *state = EngineState::Running;
        }
        self.resumed.notify_all();
    }

    fn wait_while_paused(&self) {
        let state = self.lock_state();
        let _state = self
            .resumed
            .wait_while(state, |state| *state == EngineState::Paused)
            .unwrap_or_else(PoisonError::into_inner);
    }

    fn set_stopped(&self) {
        *self.lock_state() = EngineState::Stopped;
        self.running.store(false, Ordering::Release);
        self.resumed.notify_all();
    }
}

/// Owner of the consumer thread.
///
/// Construct it once at process start, hand out [`Logger`]s, call
/// [`start`](LogEngine::start), and call [`stop`](LogEngine::stop) during
/// shutdown. Entries logged before `start` are queued and rendered once the
/// consumer runs.
pub struct LogEngine {
    shared: Arc<Shared>,
    sender: Sender<Item>,
    receiver: Option<Receiver<Item>>,
    handle: Option<JoinHandle<()>>,
}

impl LogEngine {
    pub fn new(terminal: Terminal) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            shared: Arc::new(Shared {
                terminal: Arc::new(terminal),
                state: Mutex::new(EngineState::Running),
                resumed: Condvar::new(),
                running: AtomicBool::new(false),
            }),
            sender,
            receiver: Some(receiver),
            handle: None,
        }
    }

    /// Spawns the consumer thread.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyStarted`] on a second call, or
    /// [`EngineError::Spawn`] if the thread cannot be created.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let receiver = self.receiver.take().ok_or(EngineError::AlreadyStarted)?;
        let shared = Arc::clone(&self.shared);
        shared.running.store(true, Ordering::Release);

        let handle = thread::Builder::new()
            .name(CONSUMER_THREAD.to_string())
            .spawn(move || consume(shared, receiver))
            .map_err(|source| {
                self.shared.running.store(false, Ordering::Release);
                EngineError::Spawn {
                    name: CONSUMER_THREAD,
                    source,
                }
            })?;

        self.handle = Some(handle);
        info!("log engine started");
        Ok(())
    }

    /// Returns a producer handle.
    pub fn logger(&self) -> Logger {
        Logger {
            sender: self.sender.clone(),
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> EngineState {
        self.shared.state()
    }

    /// Returns `true` between `start` and the consumer's exit.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn terminal(&self) -> &Arc<Terminal> {
        &self.shared.terminal
    }

    /// Renders everything queued so far, then joins the consumer.
    ///
    /// Shutdown is cooperative: a progress that is still running keeps the
    /// consumer parked, so finish or drop it before calling `stop`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Panicked`] if the consumer thread panicked.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        if self.sender.send(Item::Shutdown).is_err() {
            debug!("log consumer already gone");
        }
        let joined = handle.join();
        self.shared.set_stopped();
        info!("log engine stopped");
        joined.map_err(|_| EngineError::Panicked(CONSUMER_THREAD))
    }
}

impl Drop for LogEngine {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!(error = %err, "log engine did not stop cleanly");
        }
    }
}

impl std::fmt::Debug for LogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEngine")
            .field("state", &self.state())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

fn consume(shared: Arc<Shared>, receiver: Receiver<Item>) {
    debug!("log consumer waiting for entries");
    loop {
        let item = match receiver.recv() {
            Ok(item) => item,
            Err(err) => {
                error!(error = %err, "log queue disconnected, consumer exiting");
                break;
            }
        };

        match item {
            Item::Entry(entry) => {
                if let Err(err) = shared.terminal.render_entry(&entry) {
                    error!(error = %err, "failed to write log entry");
                }
                entry.mark_rendered();
            }
            Item::Progress(progress) => {
                if progress.activate() {
                    shared.wait_while_paused();
                }
            }
            Item::Shutdown => break,
        }
    }
    shared.set_stopped();
}

/// Cloneable producer handle for the log engine.
#[derive(Clone)]
pub struct Logger {
    sender: Sender<Item>,
    shared: Arc<Shared>,
}

impl Logger {
    /// Queues an entry and returns a handle to observe its rendering.
    pub fn log(&self, entry: LogEntry) -> Arc<LogEntry> {
        let entry = Arc::new(entry);
        if self.sender.send(Item::Entry(Arc::clone(&entry))).is_err() {
            warn!(message = entry.message(), "log engine stopped, entry dropped");
        }
        entry
    }

    pub fn info(&self, message: impl Into<String>) -> Arc<LogEntry> {
        self.log(LogEntry::new(LogKind::Info, message))
    }

    pub fn warn(&self, message: impl Into<String>) -> Arc<LogEntry> {
        self.log(LogEntry::new(LogKind::Warning, message))
    }

    pub fn error(&self, message: impl Into<String>) -> Arc<LogEntry> {
        self.log(LogEntry::new(LogKind::Error, message))
    }

    /// Logs an error with attached failure detail.
    pub fn error_with(&self, message: impl Into<String>, detail: impl Into<String>) -> Arc<LogEntry> {
        self.log(LogEntry::new(LogKind::Error, message).with_detail(detail))
    }

    pub fn debug(&self, message: impl Into<String>) -> Arc<LogEntry> {
        self.log(LogEntry::new(LogKind::Debug, message))
    }

    /// Queues a progress bar of `total_steps` steps.
    ///
    /// The bar takes over the terminal once every entry queued before it has
    /// been rendered.
    pub fn progress(&self, label: impl Into<String>, total_steps: u32) -> Progress {
        let inner = Arc::new(ProgressInner::new(
            label.into(),
            total_steps,
            Arc::clone(&self.shared),
        ));
        if self.sender.send(Item::Progress(Arc::clone(&inner))).is_err() {
            warn!(label = inner.label(), "log engine stopped, progress not shown");
        }
        Progress::new(inner)
    }

    pub fn state(&self) -> EngineState {
        self.shared.state()
    }

    /// Prints the prompt and marks the input loop as waiting for a line.
    pub(crate) fn show_prompt(&self) {
        if let Err(err) = self.shared.terminal.show_prompt() {
            warn!(error = %err, "failed to print prompt");
        }
    }

    pub(crate) fn input_received(&self) {
        self.shared.terminal.input_received();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
