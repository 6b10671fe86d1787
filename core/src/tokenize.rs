//! Line tokenizer for the console grammar.
//!
//! ```text
//! <command> [arg ...] [--tagName [value]]...
//! ```
//!
//! The first `--` token switches the tokenizer into tag mode for the rest of
//! the line. Bare tokens seen in tag mode are dropped rather than treated as
//! positional arguments, so positional arguments must precede every tag.
//!
//! # Examples
//!
//! ```
//! use persona_console_core::{tokenize, ValueKind};
//!
//! let line = tokenize("say hello --to 'the innkeeper' --times 3 --loud");
//! assert_eq!(line.command, "say");
//! assert_eq!(line.args, vec!["hello"]);
//! assert_eq!(line.tags[0].value.as_deref(), Some("the innkeeper"));
//! assert_eq!(line.tags[1].kind, ValueKind::Number);
//! assert_eq!(line.tags[2].kind, ValueKind::None);
//! ```

use crate::types::{ParsedLine, ParsedTag, TAG_PREFIX, ValueKind};

const QUOTES: [char; 2] = ['"', '\''];

/// Tokenizes one input line into a [`ParsedLine`].
///
/// Never fails: values that cannot be classified leave the tag as a bare
/// flag, and an empty line yields an empty command.
pub fn tokenize(input: &str) -> ParsedLine {
    let tokens: Vec<&str> = input.trim().split(' ').collect();
    let Some((command, rest)) = tokens.split_first() else {
        return ParsedLine::default();
    };

    let mut line = ParsedLine {
        command: command.to_string(),
        ..Default::default()
    };
    let mut tag_mode = false;
    let mut index = 0;

    while index < rest.len() {
        let token = rest[index];
        index += 1;

        if token.starts_with(TAG_PREFIX) {
            tag_mode = true;
            let (tag, consumed) = parse_tag(token, &rest[index..]);
            index += consumed;
            line.tags.push(tag);
        } else if !tag_mode && !token.is_empty() {
            line.args.push(token.to_string());
        }
    }

    line
}

/// Parses the value following a tag name.
///
/// Returns the tag and the number of tokens consumed from `rest`.
fn parse_tag(name: &str, rest: &[&str]) -> (ParsedTag, usize) {
    let skipped = rest.iter().take_while(|token| token.is_empty()).count();
    let Some(next) = rest.get(skipped) else {
        return (ParsedTag::flag(name), 0);
    };

    if let Some(quote) = next.chars().next().filter(|c| QUOTES.contains(c)) {
        let (value, consumed) = read_quoted(quote, &rest[skipped..]);
        return (
            ParsedTag::with_value(name, &value, ValueKind::String),
            skipped + consumed,
        );
    }

    if next.parse::<f64>().is_ok_and(f64::is_finite) {
        return (
            ParsedTag::with_value(name, next, ValueKind::Number),
            skipped + 1,
        );
    }

    if next.eq_ignore_ascii_case("true") || next.eq_ignore_ascii_case("false") {
        return (
            ParsedTag::with_value(name, next, ValueKind::Boolean),
            skipped + 1,
        );
    }

    (ParsedTag::flag(name), 0)
}

/// Reads a quoted value starting at `tokens[0]`, re-joining split tokens.
fn read_quoted(quote: char, tokens: &[&str]) -> (String, usize) {
    let mut closed = false;
    let mut consumed = 0;

    for (position, token) in tokens.iter().enumerate() {
        consumed = position + 1;
        let opener_only = position == 0 && token.len() == 1;
        if !opener_only && token.ends_with(quote) {
            closed = true;
            break;
        }
    }

    let joined = tokens[..consumed].join(" ");
    let inner = &joined[quote.len_utf8()..];
    let inner = if closed {
        &inner[..inner.len() - quote.len_utf8()]
    } else {
        inner
    };
    (inner.to_string(), consumed)
}
