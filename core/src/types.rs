//! Type definitions for tokenized console input.
//!
//! This module defines the data model produced by the tokenizer and consumed
//! by command handlers and tag validation. The types derive [`serde`] traits
//! so a parsed line can be dumped for debugging or replayed from fixtures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix that marks a token as a tag (e.g. `--npc`).
pub const TAG_PREFIX: &str = "--";

/// Kind of value attached to a parsed tag.
///
/// The tokenizer infers the kind from the token following a tag name:
/// quoted text is a [`String`](ValueKind::String), a numeric literal is a
/// [`Number`](ValueKind::Number), `true`/`false` is a
/// [`Boolean`](ValueKind::Boolean), and anything else leaves the tag as a
/// bare flag ([`None`](ValueKind::None)).
///
/// # Examples
///
/// ```
/// use persona_console_core::ValueKind;
///
/// assert_eq!(ValueKind::default(), ValueKind::None);
/// assert_eq!(ValueKind::Number.to_string(), "NUMBER");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValueKind {
    /// Quoted text with the outer quotes removed.
    String,
    /// Finite floating-point literal, kept as its raw text.
    Number,
    /// Case-insensitive `true` or `false`.
    Boolean,
    /// Bare flag without a value (the default).
    #[default]
    None,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::String => "STRING",
            ValueKind::Number => "NUMBER",
            ValueKind::Boolean => "BOOLEAN",
            ValueKind::None => "NONE",
        };
        f.write_str(label)
    }
}

/// One keyed tag parsed from an input line.
///
/// `name` keeps the `--` prefix exactly as typed. The raw `value` text is
/// preserved for every kind; use [`as_number`](ParsedTag::as_number) or
/// [`as_bool`](ParsedTag::as_bool) for typed access.
///
/// # Examples
///
/// ```
/// use persona_console_core::{ParsedTag, ValueKind};
///
/// let tag = ParsedTag::with_value("--volume", "0.5", ValueKind::Number);
/// assert_eq!(tag.as_number(), Some(0.5));
/// assert!(tag.matches("--VOLUME"));
///
/// let flag = ParsedTag::flag("--quiet");
/// assert_eq!(flag.kind, ValueKind::None);
/// assert!(flag.value.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTag {
    /// Tag name including its prefix (e.g. "--npc")
    pub name: String,
    /// Raw value text, absent for bare flags
    pub value: Option<String>,
    /// Inferred kind of the value
    pub kind: ValueKind,
}

impl ParsedTag {
    /// Creates a bare flag without a value.
    pub fn flag(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            kind: ValueKind::None,
        }
    }

    /// Creates a tag carrying a value of the given kind.
    pub fn with_value(name: &str, value: &str, kind: ValueKind) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
            kind,
        }
    }

    /// Returns `true` if this tag's name equals `name`, ignoring ASCII case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the value as a number when the tag was parsed as one.
    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Number => self.value.as_deref()?.parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as a boolean when the tag was parsed as one.
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Boolean => {
                let value = self.value.as_deref()?;
                Some(value.eq_ignore_ascii_case("true"))
            }
            _ => None,
        }
    }
}

/// Structured result of tokenizing one input line.
///
/// # Examples
///
/// ```
/// use persona_console_core::tokenize;
///
/// let line = tokenize("session switch --npc \"001\"");
/// assert_eq!(line.command, "session");
/// assert_eq!(line.args, vec!["switch"]);
/// assert_eq!(line.tag("--npc").and_then(|t| t.value.as_deref()), Some("001"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Command name (first token)
    pub command: String,
    /// Positional tokens preceding the first tag
    pub args: Vec<String>,
    /// Tags in input order
    pub tags: Vec<ParsedTag>,
}

impl ParsedLine {
    /// Returns `true` when the line carried no command at all.
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }

    /// Finds the first tag with the given name (case-insensitive).
    pub fn tag(&self, name: &str) -> Option<&ParsedTag> {
        self.tags.iter().find(|tag| tag.matches(name))
    }

    /// Returns `true` if a tag with the given name is present.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }

    /// Returns the positional argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Constraint on how many tags of a [`TagSet`](crate::TagSet) may appear
/// together on one line.
///
/// # Examples
///
/// ```
/// use persona_console_core::Inclusivity;
///
/// assert!(Inclusivity::Inclusive.permits(5));
/// assert!(Inclusivity::Exclusive.permits(1));
/// assert!(!Inclusivity::Exclusive.permits(2));
/// assert!(!Inclusivity::RequiredInclusive.permits(0));
/// assert!(Inclusivity::RequiredExclusive.permits(1));
/// assert!(Inclusivity::Restricted.permits(0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Inclusivity {
    /// Any number of tags, including none (the default).
    #[default]
    Inclusive,
    /// At most one tag.
    Exclusive,
    /// At least one tag.
    RequiredInclusive,
    /// Exactly one tag.
    RequiredExclusive,
    /// No tags at all.
    Restricted,
}

impl Inclusivity {
    /// Decides whether `count` matching tags satisfy this rule.
    pub fn permits(self, count: usize) -> bool {
        match self {
            Inclusivity::Inclusive => true,
            Inclusivity::Exclusive => count <= 1,
            Inclusivity::RequiredInclusive => count >= 1,
            Inclusivity::RequiredExclusive => count == 1,
            Inclusivity::Restricted => count == 0,
        }
    }

    /// Short human-readable description used in help output.
    pub fn describe(self) -> &'static str {
        match self {
            Inclusivity::Inclusive => "any of",
            Inclusivity::Exclusive => "at most one of",
            Inclusivity::RequiredInclusive => "at least one of",
            Inclusivity::RequiredExclusive => "exactly one of",
            Inclusivity::Restricted => "none of",
        }
    }
}

impl fmt::Display for Inclusivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Inclusivity::Inclusive => "INCLUSIVE",
            Inclusivity::Exclusive => "EXCLUSIVE",
            Inclusivity::RequiredInclusive => "REQUIRED_INCLUSIVE",
            Inclusivity::RequiredExclusive => "REQUIRED_EXCLUSIVE",
            Inclusivity::Restricted => "RESTRICTED",
        };
        f.write_str(label)
    }
}
