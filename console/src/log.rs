//! Log entries and their text layout.
//!
//! An entry renders as
//!
//! ```text
//! [2026-01-31 18:04:11] [WARNING] -> first line
//!                                    second line
//! ```
//!
//! with continuation lines aligned under the message column.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local};
use crossterm::style::{Color, Stylize};

/// Timestamp layout used in every log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity/type of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Info,
    Warning,
    Error,
    Debug,
    /// Labels progress lines; progress bars draw themselves instead of
    /// queueing entries of this kind.
    Progress,
}

impl LogKind {
    /// Upper-case label shown between brackets.
    pub fn label(self) -> &'static str {
        match self {
            LogKind::Info => "INFO",
            LogKind::Warning => "WARNING",
            LogKind::Error => "ERROR",
            LogKind::Debug => "DEBUG",
            LogKind::Progress => "PROGRESS",
        }
    }

    fn color(self) -> Color {
        match self {
            LogKind::Info => Color::Cyan,
            LogKind::Warning => Color::Yellow,
            LogKind::Error => Color::Red,
            LogKind::Debug => Color::DarkGrey,
            LogKind::Progress => Color::Magenta,
        }
    }

    /// Decorates `text` with this kind's color when `color` is set.
    pub(crate) fn paint(self, text: &str, color: bool) -> String {
        if color {
            text.with(self.color()).to_string()
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One message queued for rendering.
///
/// The timestamp is taken when the entry is created, so entries deferred by
/// an active progress still show when they were produced.
#[derive(Debug)]
pub struct LogEntry {
    kind: LogKind,
    message: String,
    detail: Option<String>,
    timestamp: DateTime<Local>,
    rendered: AtomicBool,
}

impl LogEntry {
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            timestamp: Local::now(),
            rendered: AtomicBool::new(false),
        }
    }

    /// Attaches failure detail, rendered as a `caused by:` line.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn kind(&self) -> LogKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Returns `true` once the consumer has written (or deliberately
    /// skipped) this entry.
    pub fn is_rendered(&self) -> bool {
        self.rendered.load(Ordering::Acquire)
    }

    pub(crate) fn mark_rendered(&self) {
        self.rendered.store(true, Ordering::Release);
    }

    /// Lays the entry out as terminal text, without a trailing newline.
    pub fn format(&self, color: bool) -> String {
        let timestamp = self.timestamp.format(TIMESTAMP_FORMAT).to_string();
        let label = self.kind.label();
        let width = format!("[{timestamp}] [{label}] -> ").chars().count();
        let indent = " ".repeat(width);

        let mut out = format!(
            "[{timestamp}] [{}] -> ",
            self.kind.paint(label, color)
        );
        for (index, line) in self.message.lines().enumerate() {
            if index > 0 {
                out.push('\n');
                out.push_str(&indent);
            }
            out.push_str(line);
        }

        if let Some(detail) = &self.detail {
            for (index, line) in detail.lines().enumerate() {
                out.push('\n');
                out.push_str(&indent);
                if index == 0 {
                    out.push_str("caused by: ");
                } else {
                    out.push_str("           ");
                }
                out.push_str(line);
            }
        }

        out
    }
}
