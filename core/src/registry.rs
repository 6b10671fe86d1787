//! Case-insensitive name registries.
//!
//! Commands, tags and tag sets all live in a [`NameRegistry`], so every one
//! of them follows the same uniqueness contract: names are compared
//! case-insensitively and registering a name twice is an error.
//!
//! # Examples
//!
//! ```
//! use persona_console_core::{NameRegistry, RegistryError};
//!
//! let mut registry = NameRegistry::new("command");
//! registry.insert("Help", 1).unwrap();
//! assert_eq!(registry.get("HELP"), Some(&1));
//!
//! let err = registry.insert("help", 2).unwrap_err();
//! assert!(matches!(err, RegistryError::Duplicate { .. }));
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::tag::{Tag, TagSet, TagSpec};

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A name is already registered (compared case-insensitively).
    #[error("duplicate {kind} name: {name}")]
    Duplicate {
        /// What kind of item was being registered (e.g. "tag").
        kind: &'static str,
        /// The rejected name as given.
        name: String,
    },
    /// The name is empty or whitespace-only.
    #[error("{kind} name cannot be empty")]
    EmptyName {
        /// What kind of item was being registered.
        kind: &'static str,
    },
}

/// Map from lower-cased names to values, iterated in name order.
#[derive(Debug, Clone)]
pub struct NameRegistry<V> {
    kind: &'static str,
    entries: BTreeMap<String, V>,
}

impl<V> NameRegistry<V> {
    /// Creates an empty registry; `kind` names the items in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Registers `value` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyName`] for a blank name and
    /// [`RegistryError::Duplicate`] if the name is already taken.
    pub fn insert(&mut self, name: &str, value: V) -> Result<(), RegistryError> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(RegistryError::EmptyName { kind: self.kind });
        }
        if self.entries.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Looks up a value by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(&name.trim().to_lowercase())
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over values sorted by lower-cased name.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of every declared tag and tag set.
///
/// Tags and tag sets are registered when a command is constructed, which
/// turns a duplicate declaration into a construction-time error.
///
/// # Examples
///
/// ```
/// use persona_console_core::{Inclusivity, Tag, TagRegistry, TagSet};
///
/// let mut registry = TagRegistry::new();
/// let npc: Tag<u32> = Tag::new("--npc", "Select an npc", "--npc <id>", "npc", |raw| raw.parse().ok());
/// registry.register_tag(&npc).unwrap();
///
/// let set = TagSet::new("selection", Inclusivity::RequiredInclusive).with_tag(&npc);
/// registry.register_set(set).unwrap();
///
/// assert!(registry.register_tag(&npc).is_err());
/// assert!(registry.set("SELECTION").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TagRegistry {
    tags: NameRegistry<TagSpec>,
    sets: NameRegistry<TagSet>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TagRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tags: NameRegistry::new("tag"),
            sets: NameRegistry::new("tag set"),
        }
    }

    /// Records the metadata of `tag`.
    pub fn register_tag<T>(&mut self, tag: &Tag<T>) -> Result<(), RegistryError> {
        self.tags.insert(tag.name(), tag.spec().clone())
    }

    /// Records a tag set.
    pub fn register_set(&mut self, set: TagSet) -> Result<(), RegistryError> {
        let name = set.name().to_string();
        self.sets.insert(&name, set)
    }

    /// Looks up tag metadata by name.
    pub fn tag(&self, name: &str) -> Option<&TagSpec> {
        self.tags.get(name)
    }

    /// Looks up a tag set by name.
    pub fn set(&self, name: &str) -> Option<&TagSet> {
        self.sets.get(name)
    }
}

#[cfg(test)]
mod tests {
    use crate::Inclusivity;

    use super::*;

    fn tag(name: &str) -> Tag<String> {
        Tag::new(name, "test tag", name, "thing", |raw| Some(raw.to_string()))
    }

    #[test]
    fn test_registry_rejects_case_insensitive_duplicate_tags() {
        let mut registry = TagRegistry::new();
        registry.register_tag(&tag("--npc")).unwrap();

        let err = registry.register_tag(&tag("--NPC")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                kind: "tag",
                name: "--NPC".to_string()
            }
        );
    }

    #[test]
    fn test_registry_rejects_case_insensitive_duplicate_sets() {
        let mut registry = TagRegistry::new();
        registry
            .register_set(TagSet::new("Session", Inclusivity::Inclusive))
            .unwrap();

        let err = registry
            .register_set(TagSet::new("session", Inclusivity::Exclusive))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { kind: "tag set", .. }));
        assert_eq!(registry.set("session").unwrap().inclusivity(), Inclusivity::Inclusive);
    }

    #[test]
    fn test_registry_rejects_blank_names() {
        let mut registry: NameRegistry<()> = NameRegistry::new("command");
        assert_eq!(
            registry.insert("  ", ()),
            Err(RegistryError::EmptyName { kind: "command" })
        );
    }

    #[test]
    fn test_registry_iterates_in_name_order() {
        let mut registry = NameRegistry::new("command");
        registry.insert("beta", "b").unwrap();
        registry.insert("Alpha", "a").unwrap();
        registry.insert("gamma", "g").unwrap();

        let values: Vec<&str> = registry.values().copied().collect();
        assert_eq!(values, vec!["a", "b", "g"]);
    }
}
