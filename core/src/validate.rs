//! Tag usage validation.
//!
//! Counts how many of the provided tags belong to a [`TagSet`] and checks
//! that count against the set's [`Inclusivity`](crate::Inclusivity) rule.
//! Tags that are not members of the set never contribute to the count.
//!
//! # Examples
//!
//! ```
//! use persona_console_core::*;
//!
//! let npc: Tag<()> = Tag::new("--npc", "", "", "npc", |_| Some(()));
//! let set = TagSet::new("session", Inclusivity::RequiredInclusive).with_tag(&npc);
//!
//! assert_eq!(validate_tag_set(&set, &tokenize("s --npc 1 --npc 2").tags), Ok(2));
//!
//! let err = validate_tag_set(&set, &tokenize("s --unrelated").tags).unwrap_err();
//! assert!(matches!(err, ValidationError::InvalidTagUsage { count: 0, .. }));
//! ```

use thiserror::Error;

use crate::tag::TagSet;
use crate::types::{Inclusivity, ParsedTag};

/// Tag validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The number of tags from a set violates its rule.
    #[error("invalid tag usage: {set} expects {} [{tags}], got {count}", .rule.describe())]
    InvalidTagUsage {
        /// Name of the tag set.
        set: String,
        /// The rule that was violated.
        rule: Inclusivity,
        /// Comma-separated member tag names.
        tags: String,
        /// Number of member tags that were provided.
        count: usize,
    },
}

/// Validates `provided` against `set`, returning the member count.
pub fn validate_tag_set(set: &TagSet, provided: &[ParsedTag]) -> Result<usize, ValidationError> {
    let count = provided.iter().filter(|tag| set.contains(&tag.name)).count();
    let rule = set.inclusivity();

    if rule.permits(count) {
        return Ok(count);
    }

    Err(ValidationError::InvalidTagUsage {
        set: set.name().to_string(),
        rule,
        tags: set
            .tags()
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        count,
    })
}
