//! Console configuration and roster loading for the persona console.
//!
//! This crate provides the data the console works with: the
//! [`ConsoleConfig`] read from a YAML file, and the [`Roster`] of npcs and
//! players that `session switch` selects from.
//!
//! # Quick start
//!
//! ```no_run
//! use persona_console_roster::{ConsoleConfig, Roster};
//!
//! let config = ConsoleConfig::load("console.yaml").unwrap();
//! let roster = match config.roster_path(Some("console.yaml".as_ref())) {
//!     Some(path) => Roster::from_file(path).unwrap(),
//!     None => Roster::empty(),
//! };
//! println!("{} records loaded", roster.len());
//! ```

mod config;
mod error;
mod loader;
mod model;

pub use config::{ConsoleConfig, DEFAULT_PROMPT};
pub use error::{Result, RosterError};
pub use loader::{Roster, RosterSource};
pub use model::{Npc, Player};
