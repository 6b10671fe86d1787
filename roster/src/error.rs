//! Error types for configuration and roster loading.
//!
//! Provides a unified error type covering all failure modes: I/O,
//! serialization, unsupported file formats, and roster validation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading configuration or roster data.
#[derive(Debug, Error)]
pub enum RosterError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is neither YAML nor JSON.
    #[error("unsupported roster format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Roster validation failure (e.g., empty or duplicate ids).
    #[error("invalid roster: {0}")]
    InvalidRoster(String),
}

/// Convenience alias for results with [`RosterError`].
pub type Result<T> = std::result::Result<T, RosterError>;
