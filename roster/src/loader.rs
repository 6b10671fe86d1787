//! Roster loading and lookup.
//!
//! Provides [`Roster`], the in-memory collection of npcs and players the
//! console can switch between.
//!
//! # Loading patterns
//!
//! ```no_run
//! use persona_console_roster::Roster;
//!
//! // YAML or JSON, chosen by file extension
//! let roster = Roster::from_file("roster.yaml").unwrap();
//! assert!(roster.npc("001").is_some());
//!
//! // Nothing configured
//! let roster = Roster::empty();
//! assert!(roster.is_empty());
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::model::{Npc, Player};

/// Describes where a [`Roster`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RosterSource {
    /// Loaded from a YAML or JSON file.
    File(PathBuf),
    /// Parsed from an in-memory string.
    Inline,
    /// No roster configured.
    #[default]
    Empty,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RosterFile {
    #[serde(default)]
    npcs: Vec<Npc>,
    #[serde(default)]
    players: Vec<Player>,
}

/// Npc and player records with lookup by id.
///
/// Ids are matched exactly; the roster is validated on load so every id is
/// non-empty and unique within its list.
///
/// # Examples
///
/// ```
/// use persona_console_roster::Roster;
///
/// let roster = Roster::from_yaml_str(r#"
/// npcs:
///   - { id: "001", name: Mira }
/// players:
///   - { id: "p1", name: Ash }
/// "#).unwrap();
///
/// assert_eq!(roster.npc("001").unwrap().name, "Mira");
/// assert_eq!(roster.player("p1").unwrap().name, "Ash");
/// assert!(roster.npc("999").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Roster {
    npcs: Vec<Npc>,
    players: Vec<Player>,
    source: RosterSource,
}

impl Roster {
    /// Returns a roster with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a roster from records, validating ids.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidRoster`] for empty or duplicate ids.
    pub fn new(npcs: Vec<Npc>, players: Vec<Player>) -> Result<Self> {
        let roster = Self {
            npcs,
            players,
            source: RosterSource::Inline,
        };
        roster.validate()?;
        Ok(roster)
    }

    /// Loads a roster file, choosing the format by extension
    /// (`.yaml`/`.yml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::UnsupportedFormat`] for other extensions,
    /// [`RosterError::IoError`] if the file cannot be read, a parse error
    /// for malformed content, or [`RosterError::InvalidRoster`] if
    /// validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let file = match extension.as_deref() {
            Some("yaml" | "yml") => {
                let reader = std::io::BufReader::new(std::fs::File::open(path)?);
                serde_yaml::from_reader::<_, RosterFile>(reader)?
            }
            Some("json") => {
                let reader = std::io::BufReader::new(std::fs::File::open(path)?);
                serde_json::from_reader::<_, RosterFile>(reader)?
            }
            _ => return Err(RosterError::UnsupportedFormat(path.to_path_buf())),
        };

        Self::from_parts(file, RosterSource::File(path.to_path_buf()))
    }

    /// Parses a roster from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: RosterFile = serde_yaml::from_str(yaml)?;
        Self::from_parts(file, RosterSource::Inline)
    }

    /// Parses a roster from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: RosterFile = serde_json::from_str(json)?;
        Self::from_parts(file, RosterSource::Inline)
    }

    fn from_parts(file: RosterFile, source: RosterSource) -> Result<Self> {
        let roster = Self {
            npcs: file.npcs,
            players: file.players,
            source,
        };
        roster.validate()?;
        Ok(roster)
    }

    /// Checks that ids are non-empty and unique per record kind.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::InvalidRoster`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        check_ids("npc", self.npcs.iter().map(|npc| npc.id.as_str()))?;
        check_ids("player", self.players.iter().map(|player| player.id.as_str()))
    }

    /// Looks up an npc by id.
    pub fn npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id == id)
    }

    /// Looks up a player by id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    /// All npcs in file order.
    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// All players in file order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.npcs.len() + self.players.len()
    }

    /// Returns `true` if the roster holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &RosterSource {
        &self.source
    }
}

fn check_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(RosterError::InvalidRoster(format!("{kind} id cannot be empty")));
        }
        if !seen.insert(id) {
            return Err(RosterError::InvalidRoster(format!("duplicate {kind} id: {id}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_str_defaults_missing_lists() {
        let roster = Roster::from_yaml_str("npcs:\n  - { id: \"7\", name: Bo }\n").unwrap();
        assert_eq!(roster.npcs().len(), 1);
        assert!(roster.players().is_empty());
        assert_eq!(roster.source(), &RosterSource::Inline);
    }

    #[test]
    fn test_from_json_str() {
        let roster = Roster::from_json_str(
            r#"{"npcs":[{"id":"001","name":"Mira","description":"Innkeeper"}],"players":[]}"#,
        )
        .unwrap();
        assert_eq!(roster.npc("001").unwrap().description.as_deref(), Some("Innkeeper"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Roster::new(
            vec![Npc::new("001", "Mira"), Npc::new("001", "Tova")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, RosterError::InvalidRoster(msg) if msg == "duplicate npc id: 001"));
    }

    #[test]
    fn test_rejects_empty_ids() {
        let err = Roster::new(vec![], vec![Player::new(" ", "Nobody")]).unwrap_err();
        assert!(matches!(err, RosterError::InvalidRoster(msg) if msg == "player id cannot be empty"));
    }

    #[test]
    fn test_same_id_allowed_across_kinds() {
        let roster = Roster::new(vec![Npc::new("1", "Mira")], vec![Player::new("1", "Ash")]).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_lookup_is_exact() {
        let roster = Roster::new(vec![Npc::new("001", "Mira")], vec![]).unwrap();
        assert!(roster.npc("001").is_some());
        assert!(roster.npc("1").is_none());
        assert!(roster.npc("001 ").is_none());
    }

    #[test]
    fn test_empty_roster() {
        let roster = Roster::empty();
        assert!(roster.is_empty());
        assert_eq!(roster.source(), &RosterSource::Empty);
    }
}
