//! Console configuration.
//!
//! Defines the YAML-serializable settings that control how the console
//! renders output and where it finds its roster.
//!
//! # Example YAML
//!
//! ```yaml
//! prompt: "> "
//! show_debug: false
//! color: true
//! roster: roster.yaml
//! ```
//!
//! Every field is optional; missing fields take their [`Default`] values.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Prompt printed while the console waits for input.
pub const DEFAULT_PROMPT: &str = "> ";

/// Top-level console configuration.
///
/// # Examples
///
/// ```
/// use persona_console_roster::ConsoleConfig;
///
/// let config: ConsoleConfig = serde_yaml::from_str("show_debug: true").unwrap();
/// assert!(config.show_debug);
/// assert_eq!(config.prompt, "> ");
/// assert!(config.roster.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Text printed before each input line.
    pub prompt: String,
    /// Render DEBUG log entries.
    pub show_debug: bool,
    /// Decorate log type tags with terminal colors.
    pub color: bool,
    /// Roster file (YAML or JSON) to load at startup.
    pub roster: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            show_debug: false,
            color: true,
            roster: None,
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RosterError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::RosterError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RosterError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::RosterError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Resolves the roster path relative to the directory of the config file.
    ///
    /// Absolute roster paths are returned unchanged.
    pub fn roster_path(&self, config_path: Option<&Path>) -> Option<PathBuf> {
        let roster = self.roster.as_ref()?;
        if roster.is_absolute() {
            return Some(roster.clone());
        }
        match config_path.and_then(Path::parent) {
            Some(dir) => Some(dir.join(roster)),
            None => Some(roster.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
prompt: "persona> "
show_debug: true
color: false
roster: data/roster.yaml
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ConsoleConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.prompt, "persona> ");
        assert!(config.show_debug);
        assert!(!config.color);
        assert_eq!(config.roster, Some(PathBuf::from("data/roster.yaml")));
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: ConsoleConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn test_roster_path_is_relative_to_config_dir() {
        let config: ConsoleConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let resolved = config.roster_path(Some(Path::new("/etc/persona/console.yaml")));
        assert_eq!(resolved, Some(PathBuf::from("/etc/persona/data/roster.yaml")));
    }

    #[test]
    fn test_roster_path_without_config_file() {
        let config: ConsoleConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(
            config.roster_path(None),
            Some(PathBuf::from("data/roster.yaml"))
        );
        assert_eq!(ConsoleConfig::default().roster_path(None), None);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.yaml");

        let original: ConsoleConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = ConsoleConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }
}
