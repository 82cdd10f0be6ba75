//! Namespace strings and their validation.
//!
//! A namespace is a `:`-delimited path such as `db:pool:conn`. Mutation
//! accepts a trailing `*` segment (`db:*`) to address the cascading level of
//! `db` instead of its exact level. The root namespace can be named with the
//! [`Namespace::Root`] marker, the empty string, or the root key `$`.

use std::fmt;

use crate::error::{Error, Result};

pub const DELIMITER: char = ':';
pub const WILDCARD: &str = "*";
pub const ROOT_KEY: &str = "$";

/// A namespace as handed to the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace<'a> {
    /// The implicit root namespace, distinct from every string.
    Root,
    Named(&'a str),
}

impl<'a> From<&'a str> for Namespace<'a> {
    fn from(s: &'a str) -> Self {
        Namespace::Named(s)
    }
}

impl<'a> From<&'a String> for Namespace<'a> {
    fn from(s: &'a String) -> Self {
        Namespace::Named(s.as_str())
    }
}

impl fmt::Display for Namespace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Root => f.write_str(ROOT_KEY),
            Namespace::Named(s) => f.write_str(s),
        }
    }
}

/// A validated namespace: its path below the root and whether it ended in `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedNamespace {
    pub segments: Vec<String>,
    pub wildcard: bool,
}

impl ParsedNamespace {
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Split and validate a namespace.
///
/// Lookups pass `allow_wildcard = false`; only mutation may address a
/// cascading level.
pub fn parse(namespace: Namespace<'_>, allow_wildcard: bool) -> Result<ParsedNamespace> {
    let input = match namespace {
        Namespace::Root => return Ok(ParsedNamespace::default()),
        Namespace::Named(s) => s,
    };
    if input.is_empty() || input == ROOT_KEY {
        return Ok(ParsedNamespace::default());
    }

    if input.ends_with(DELIMITER) {
        return Err(Error::TrailingDelimiter {
            input: input.to_string(),
        });
    }

    let mut segments: Vec<&str> = input.split(DELIMITER).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(Error::EmptySegment {
            input: input.to_string(),
        });
    }

    let mut wildcard = false;
    if segments.last() == Some(&WILDCARD) {
        if !allow_wildcard {
            return Err(Error::WildcardNotAllowed {
                input: input.to_string(),
            });
        }
        wildcard = true;
        segments.pop();
    }
    if segments.contains(&WILDCARD) {
        return Err(Error::MisplacedWildcard {
            input: input.to_string(),
        });
    }

    // `$:*` addresses the root's cascading level
    if segments == [ROOT_KEY] {
        segments.clear();
    }

    Ok(ParsedNamespace {
        segments: segments.into_iter().map(str::to_owned).collect(),
        wildcard,
    })
}
