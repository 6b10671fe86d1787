//! Tags and tag sets.
//!
//! A [`Tag`] is a named, typed resolver for one keyed option: it turns the
//! raw text typed after `--name` into a domain value. A [`TagSet`] groups tag
//! names under one [`Inclusivity`] rule that decides how many of them may
//! appear on a line together.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Inclusivity, ParsedTag};
use crate::validate::{ValidationError, validate_tag_set};

/// Errors raised while resolving a tag value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The resolver found no entity for the given value.
    #[error("no {entity} found with id: {value}")]
    NotFound {
        /// Kind of entity the tag resolves (e.g. "npc").
        entity: String,
        /// The value that failed to resolve.
        value: String,
    },
    /// The tag was supplied as a bare flag but needs a value.
    #[error("tag {0} requires a value")]
    MissingValue(String),
}

/// Display metadata shared by a tag and the sets that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSpec {
    /// Tag name including prefix (e.g. "--npc")
    pub name: String,
    /// One-line description for help output
    pub description: String,
    /// Usage hint (e.g. `--npc "<id>"`)
    pub usage: String,
}

type Resolver<T> = Box<dyn Fn(&str) -> Option<T> + Send + Sync>;

/// A named resolver from raw tag text to a value of type `T`.
///
/// # Examples
///
/// ```
/// use persona_console_core::{Tag, TagError};
///
/// let names = ["ada", "bob"];
/// let tag = Tag::new("--who", "Pick a person", "--who <name>", "person", move |raw| {
///     names.iter().position(|n| *n == raw)
/// });
///
/// assert_eq!(tag.apply("bob"), Ok(1));
/// assert_eq!(
///     tag.apply("eve").unwrap_err().to_string(),
///     "no person found with id: eve"
/// );
/// ```
pub struct Tag<T> {
    spec: TagSpec,
    entity: String,
    resolver: Resolver<T>,
}

impl<T> Tag<T> {
    /// Creates a tag.
    ///
    /// `entity` names what the tag resolves to and appears in
    /// [`TagError::NotFound`] messages.
    pub fn new<F>(name: &str, description: &str, usage: &str, entity: &str, resolver: F) -> Self
    where
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            spec: TagSpec {
                name: name.to_string(),
                description: description.to_string(),
                usage: usage.to_string(),
            },
            entity: entity.to_string(),
            resolver: Box::new(resolver),
        }
    }

    /// Tag name including prefix.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Display metadata.
    pub fn spec(&self) -> &TagSpec {
        &self.spec
    }

    /// Resolves a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::NotFound`] when the resolver has no match.
    pub fn apply(&self, raw: &str) -> Result<T, TagError> {
        (self.resolver)(raw).ok_or_else(|| TagError::NotFound {
            entity: self.entity.clone(),
            value: raw.to_string(),
        })
    }

    /// Resolves the value carried by a parsed tag.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::MissingValue`] for a bare flag, otherwise the
    /// errors of [`apply`](Tag::apply).
    pub fn apply_parsed(&self, tag: &ParsedTag) -> Result<T, TagError> {
        let raw = tag
            .value
            .as_deref()
            .ok_or_else(|| TagError::MissingValue(tag.name.clone()))?;
        self.apply(raw)
    }
}

impl<T> fmt::Debug for Tag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("spec", &self.spec)
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}

/// A named group of tags governed by one [`Inclusivity`] rule.
///
/// # Examples
///
/// ```
/// use persona_console_core::{tokenize, Inclusivity, Tag, TagSet};
///
/// let npc: Tag<String> = Tag::new("--npc", "", "", "npc", |raw| Some(raw.into()));
/// let player: Tag<String> = Tag::new("--player", "", "", "player", |raw| Some(raw.into()));
/// let set = TagSet::new("session", Inclusivity::RequiredExclusive)
///     .with_tag(&npc)
///     .with_tag(&player);
///
/// assert!(set.validate(&tokenize("x --npc 1").tags).is_ok());
/// assert!(set.validate(&tokenize("x --npc 1 --player 2").tags).is_err());
/// assert!(set.validate(&tokenize("x --other").tags).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    name: String,
    tags: Vec<TagSpec>,
    inclusivity: Inclusivity,
}

impl TagSet {
    /// Creates an empty tag set with the given rule.
    pub fn new(name: &str, inclusivity: Inclusivity) -> Self {
        Self {
            name: name.to_string(),
            tags: Vec::new(),
            inclusivity,
        }
    }

    /// Adds a tag reference.
    pub fn with_tag<T>(mut self, tag: &Tag<T>) -> Self {
        self.tags.push(tag.spec().clone());
        self
    }

    /// Set name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member tags in declaration order.
    pub fn tags(&self) -> &[TagSpec] {
        &self.tags
    }

    /// Governing rule.
    pub fn inclusivity(&self) -> Inclusivity {
        self.inclusivity
    }

    /// Returns `true` if `name` is one of this set's tags (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name.eq_ignore_ascii_case(name))
    }

    /// Checks `provided` against this set's rule.
    ///
    /// Returns the number of provided tags that belong to the set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTagUsage`] when the rule is not met.
    pub fn validate(&self, provided: &[ParsedTag]) -> Result<usize, ValidationError> {
        validate_tag_set(self, provided)
    }
}
