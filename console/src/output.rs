//! Terminal sink shared by the log consumer, progress bars and the prompt.
//!
//! Every write takes the sink lock, so a log entry, a progress redraw and a
//! prompt never interleave mid-line.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use crate::log::{LogEntry, LogKind};

/// Rendering settings.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Text printed while waiting for input.
    pub prompt: String,
    /// Colorize type tags and progress labels.
    pub color: bool,
    /// Render DEBUG entries instead of skipping them.
    pub show_debug: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            color: false,
            show_debug: false,
        }
    }
}

/// Serialized access to the terminal (or any other writer).
pub struct Terminal {
    out: Mutex<Box<dyn Write + Send>>,
    options: RenderOptions,
    awaiting_input: AtomicBool,
}

impl Terminal {
    pub fn new(out: impl Write + Send + 'static, options: RenderOptions) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            options,
            awaiting_input: AtomicBool::new(false),
        }
    }

    /// Terminal writing to standard output.
    pub fn stdout(options: RenderOptions) -> Self {
        Self::new(io::stdout(), options)
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Returns `true` while the input loop is blocked waiting for a line.
    pub fn is_awaiting_input(&self) -> bool {
        self.awaiting_input.load(Ordering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prints the prompt and marks the input loop as waiting.
    pub(crate) fn show_prompt(&self) -> io::Result<()> {
        let mut out = self.lock();
        self.awaiting_input.store(true, Ordering::Release);
        out.write_all(self.options.prompt.as_bytes())?;
        out.flush()
    }

    /// Marks that the input loop stopped waiting (a line arrived).
    pub(crate) fn input_received(&self) {
        self.awaiting_input.store(false, Ordering::Release);
    }

    /// Writes one entry on its own line, restoring the prompt afterwards.
    ///
    /// Returns `false` if the entry was filtered out.
    pub(crate) fn render_entry(&self, entry: &LogEntry) -> io::Result<bool> {
        if entry.kind() == LogKind::Debug && !self.options.show_debug {
            return Ok(false);
        }

        let text = entry.format(self.options.color);
        let mut out = self.lock();
        clear_line(&mut *out)?;
        writeln!(out, "{text}")?;
        if self.is_awaiting_input() {
            out.write_all(self.options.prompt.as_bytes())?;
        }
        out.flush()?;
        Ok(true)
    }

    /// Redraws the current line in place.
    ///
    /// A `final_line` is terminated with a newline and followed by the
    /// prompt if the input loop is waiting.
    pub(crate) fn render_in_place(&self, text: &str, final_line: bool) -> io::Result<()> {
        let mut out = self.lock();
        clear_line(&mut *out)?;
        out.write_all(text.as_bytes())?;
        if final_line {
            out.write_all(b"\n")?;
            if self.is_awaiting_input() {
                out.write_all(self.options.prompt.as_bytes())?;
            }
        }
        out.flush()
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("options", &self.options)
            .field("awaiting_input", &self.is_awaiting_input())
            .finish_non_exhaustive()
    }
}

fn clear_line(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\r")?;
    queue!(out, Clear(ClearType::CurrentLine))
}

/// In-memory writer for capturing console output.
///
/// Clones share the same buffer, so one clone can be handed to a
/// [`Terminal`] while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, escape sequences included.
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Written text with ANSI escape sequences and carriage returns removed.
    pub fn plain_text(&self) -> String {
        strip_ansi(&self.contents())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Removes CSI escape sequences and carriage returns.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' if chars.peek() == Some(&'[') => {
                chars.next();
                for terminator in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&terminator) {
                        break;
                    }
                }
            }
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}
