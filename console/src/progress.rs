//! Self-rendering progress bars.
//!
//! A [`Progress`] is created through [`Logger::progress`](crate::Logger::progress)
//! and queued like any entry. Once the consumer reaches it, the engine pauses
//! and the bar redraws its own line on every update:
//!
//! ```text
//! Loading roster - 50%: npcs
//! Loading roster - DONE
//! ```
//!
//! Finishing (all steps done, or [`Progress::fail`]) resumes the engine.
//! Dropping an unfinished bar fails it, so an early return from a command
//! never leaves the terminal locked.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::engine::Shared;
use crate::log::LogKind;

const DONE_MARKER: &str = "DONE";
const FAILURE_MARKER: &str = "ERR";

#[derive(Debug, Default)]
struct ProgressState {
    completed_steps: u32,
    sub_message: String,
    failure: Option<String>,
    finished: bool,
    active: bool,
}

pub(crate) struct ProgressInner {
    label: String,
    total_steps: u32,
    state: Mutex<ProgressState>,
    shared: Arc<Shared>,
}

impl ProgressInner {
    pub(crate) fn new(label: String, total_steps: u32, shared: Arc<Shared>) -> Self {
        Self {
            label,
            total_steps: total_steps.max(1),
            state: Mutex::new(ProgressState::default()),
            shared,
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn percent(&self, state: &ProgressState) -> u32 {
        let percent = u64::from(state.completed_steps) * 100 / u64::from(self.total_steps);
        percent.min(100) as u32
    }

    /// Called by the consumer when it dequeues this bar.
    ///
    /// Returns `true` if the engine was paused and the consumer must wait.
    pub(crate) fn activate(&self) -> bool {
        let mut state = self.lock();
        if state.finished {
            self.render(&state);
            return false;
        }
        state.active = true;
        self.shared.pause();
        self.render(&state);
        true
    }

    fn render(&self, state: &ProgressState) {
        let color = self.shared.terminal.options().color;
        let label = LogKind::Progress.paint(&self.label, color);
        let (text, final_line) = if state.finished {
            let marker = if state.failure.is_some() {
                LogKind::Error.paint(FAILURE_MARKER, color)
            } else {
                DONE_MARKER.to_string()
            };
            let mut text = format!("{label} - {marker}");
            if let Some(failure) = &state.failure {
                text.push_str(&format!("\n  caused by: {failure}"));
            }
            (text, true)
        } else {
            (
                format!("{label} - {}%: {}", self.percent(state), state.sub_message),
                false,
            )
        };

        if let Err(err) = self.shared.terminal.render_in_place(&text, final_line) {
            error!(error = %err, label = %self.label, "failed to draw progress");
        }
    }

    fn update(&self, change: impl FnOnce(&mut ProgressState)) {
        let mut state = self.lock();
        if state.finished {
            return;
        }
        change(&mut state);
        if state.completed_steps >= self.total_steps {
            state.finished = true;
        }

        if state.active {
            self.render(&state);
            if state.finished {
                state.active = false;
                self.shared.resume();
            }
        }
        if state.finished {
            debug!(label = %self.label, failed = state.failure.is_some(), "progress finished");
        }
    }
}

/// Handle to a live progress bar.
///
/// Not `Clone`: the handle's owner decides when the bar is done. Share it
/// by reference if several threads report steps.
pub struct Progress {
    inner: Arc<ProgressInner>,
}

impl Progress {
    pub(crate) fn new(inner: Arc<ProgressInner>) -> Self {
        Self { inner }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn total_steps(&self) -> u32 {
        self.inner.total_steps
    }

    /// Completed percentage, `0.0..=100.0`.
    pub fn completed_fraction(&self) -> f64 {
        let state = self.inner.lock();
        let fraction = f64::from(state.completed_steps) * 100.0 / f64::from(self.inner.total_steps);
        fraction.min(100.0)
    }

    /// Completed percentage rounded down, as shown on screen.
    pub fn percent(&self) -> u32 {
        let state = self.inner.lock();
        self.inner.percent(&state)
    }

    pub fn sub_message(&self) -> String {
        self.inner.lock().sub_message.clone()
    }

    pub fn failure(&self) -> Option<String> {
        self.inner.lock().failure.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.lock().finished
    }

    /// Returns `true` if the bar finished through [`fail`](Progress::fail).
    pub fn is_failed(&self) -> bool {
        self.inner.lock().failure.is_some()
    }

    /// Advances by one step; the last step finishes the bar with `DONE`.
    pub fn step(&self) {
        self.inner.update(|state| {
            state.completed_steps = state.completed_steps.saturating_add(1);
        });
    }

    /// Advances by one step and replaces the sub-message.
    pub fn step_with(&self, sub_message: impl Into<String>) {
        let sub_message = sub_message.into();
        self.inner.update(|state| {
            state.completed_steps = state.completed_steps.saturating_add(1);
            state.sub_message = sub_message;
        });
    }

    /// Replaces the text shown after the percentage.
    pub fn set_sub_message(&self, sub_message: impl Into<String>) {
        let sub_message = sub_message.into();
        self.inner.update(|state| state.sub_message = sub_message);
    }

    /// Finishes the bar with `ERR` and the given detail.
    pub fn fail(&self, detail: impl Into<String>) {
        let detail = detail.into();
        self.inner.update(|state| {
            state.failure = Some(detail);
            state.finished = true;
        });
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if !self.is_finished() {
            self.fail("abandoned before completion");
        }
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Progress")
            .field("label", &self.inner.label)
            .field("total_steps", &self.inner.total_steps)
            .field("state", &*state)
            .finish()
    }
}
