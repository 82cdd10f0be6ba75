//! Severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Severity of a log call, and the threshold a namespace is configured with.
///
/// More severe levels sort lower. A call at `check` passes a threshold `t`
/// when `check <= t`, so `Off` as a threshold lets nothing through and
/// `Debug` lets everything through.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Log = 4,
    Debug = 5,
}

/// Cascading level the root namespace starts with (and returns to on reset).
pub const DEFAULT_ROOT_LEVEL: Level = Level::Info;

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Off,
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Log,
        Level::Debug,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Level::Off => "off",
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Log => "log",
            Level::Debug => "debug",
        }
    }

    /// Whether a call at `self` is emitted under `threshold`.
    #[inline]
    pub fn passes(self, threshold: Level) -> bool {
        self <= threshold
    }

    /// Whether a logger call at `self` reaches the sinks under `threshold`.
    /// `Off` is never emitted.
    #[inline]
    pub fn emits(self, threshold: Level) -> bool {
        self != Level::Off && self.passes(threshold)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Level::Off),
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "log" => Ok(Level::Log),
            "debug" => Ok(Level::Debug),
            _ => Err(Error::InvalidLevel {
                input: s.to_string(),
            }),
        }
    }
}
