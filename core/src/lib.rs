//! Tokenizer and declarative tag validation for the persona console.
//!
//! This crate defines the input side of the console:
//!
//! - [`tokenize`]: splits one input line into a [`ParsedLine`] (command
//!   name, positional arguments, typed [`ParsedTag`]s).
//! - [`Tag`]: a named resolver from raw tag text to a domain value.
//! - [`TagSet`]: a group of tags governed by an [`Inclusivity`] rule.
//! - [`NameRegistry`] / [`TagRegistry`]: case-insensitive registries that
//!   reject duplicate names.
//!
//! Validation ([`validate_tag_set`]) checks how many tags of a set were
//! supplied against the set's rule.
//!
//! # Example
//!
//! ```
//! use persona_console_core::*;
//!
//! let mut registry = TagRegistry::new();
//! let npc: Tag<String> = Tag::new(
//!     "--npc",
//!     "Select the active npc",
//!     "--npc \"<id>\"",
//!     "npc",
//!     |raw| (raw == "001").then(|| "Mira".to_string()),
//! );
//! registry.register_tag(&npc).unwrap();
//!
//! let set = TagSet::new("session", Inclusivity::RequiredInclusive).with_tag(&npc);
//! let line = tokenize("session switch --npc \"001\"");
//!
//! assert!(set.validate(&line.tags).is_ok());
//! assert_eq!(npc.apply_parsed(line.tag("--npc").unwrap()).unwrap(), "Mira");
//! ```

mod registry;
mod tag;
mod tokenize;
mod types;
mod validate;

pub use registry::{NameRegistry, RegistryError, TagRegistry};
pub use tag::{Tag, TagError, TagSet, TagSpec};
pub use tokenize::tokenize;
pub use types::*;
pub use validate::{ValidationError, validate_tag_set};
