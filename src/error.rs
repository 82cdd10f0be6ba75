//! Validation errors.
//!
//! Everything here is caller-fixable input. Broken tree invariants are bugs
//! and panic instead of surfacing as one of these.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("namespace '{input}' cannot end with a trailing delimiter")]
    TrailingDelimiter { input: String },

    #[error("namespace '{input}' cannot contain empty segments")]
    EmptySegment { input: String },

    #[error("namespace '{input}' cannot end with a wildcard")]
    WildcardNotAllowed { input: String },

    #[error("namespace '{input}' can only use a wildcard as its last segment")]
    MisplacedWildcard { input: String },

    #[error("invalid log level '{input}'. Valid levels: off, error, warn, info, log, debug")]
    InvalidLevel { input: String },

    #[error("invalid directive '{input}'. Expected: 'namespace=level'")]
    InvalidDirective { input: String },

    #[error("failed to read level config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid level config: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for malformed namespace strings, as opposed to level or config problems.
    pub fn is_namespace_error(&self) -> bool {
        matches!(
            self,
            Error::TrailingDelimiter { .. }
                | Error::EmptySegment { .. }
                | Error::WildcardNotAllowed { .. }
                | Error::MisplacedWildcard { .. }
        )
    }
}
