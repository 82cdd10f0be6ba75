//! Level configuration: a map from namespace to level.
//!
//! Loaded from a JSON object (`{"db:*": "debug", "db:pool": "warn"}`) or from
//! a directive string (`db:*=debug,db:pool=warn`), and applied to a
//! [`Registry`](crate::Registry) in one step.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::level::Level;

/// Environment variable read by [`LevelConfig::from_default_env`].
pub const DEFAULT_ENV: &str = "NSLEVEL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelConfig {
    levels: BTreeMap<String, Level>,
}

impl LevelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one entry. The namespace is validated when applied.
    pub fn insert(&mut self, namespace: impl Into<String>, level: Level) {
        self.levels.insert(namespace.into(), level);
    }

    /// Entries of `other` win.
    pub fn merge(&mut self, other: LevelConfig) {
        self.levels.extend(other.levels);
    }

    pub fn get(&self, namespace: &str) -> Option<Level> {
        self.levels.get(namespace).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Level)> {
        self.levels.iter()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse `namespace=level` pairs separated by commas.
    ///
    /// Later pairs for the same namespace replace earlier ones.
    pub fn from_directives(s: &str) -> Result<Self> {
        let mut config = Self::new();
        for directive in s.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            let Some((namespace, level)) = directive.split_once('=') else {
                return Err(Error::InvalidDirective {
                    input: directive.to_string(),
                });
            };
            config.insert(namespace.trim(), level.parse()?);
        }
        Ok(config)
    }

    /// Directives from the environment variable `var`; unset means empty.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(directives) => Self::from_directives(&directives),
            Err(_) => Ok(Self::new()),
        }
    }

    pub fn from_default_env() -> Result<Self> {
        Self::from_env(DEFAULT_ENV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directives() {
        let config = LevelConfig::from_directives(" db:*=debug, db:pool = WARN ,,").unwrap();
        assert_eq!(config.len(), 2);
        assert_eq!(config.get("db:*"), Some(Level::Debug));
        assert_eq!(config.get("db:pool"), Some(Level::Warn));
    }

    #[test]
    fn later_directive_wins() {
        let config = LevelConfig::from_directives("a=info,a=error").unwrap();
        assert_eq!(config.get("a"), Some(Level::Error));
    }

    #[test]
    fn empty_directives_are_empty_config() {
        assert!(LevelConfig::from_directives("").unwrap().is_empty());
        assert!(LevelConfig::from_directives(" , ").unwrap().is_empty());
    }

    #[test]
    fn rejects_directive_without_level() {
        let err = LevelConfig::from_directives("a:b").unwrap_err();
        assert!(matches!(err, Error::InvalidDirective { ref input } if input == "a:b"));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = LevelConfig::from_directives("a=loud").unwrap_err();
        assert!(matches!(err, Error::InvalidLevel { .. }));
    }

    #[test]
    fn loads_json_object() {
        let config = LevelConfig::from_json_str(r#"{"$:*": "warn", "net:tcp": "debug"}"#).unwrap();
        assert_eq!(config.get("$:*"), Some(Level::Warn));
        assert_eq!(config.get("net:tcp"), Some(Level::Debug));
        assert!(LevelConfig::from_json_str(r#"{"a": "loud"}"#).is_err());
        assert!(LevelConfig::from_json_str("[]").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LevelConfig::from_path("/nonexistent/nslevel.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/nslevel.json"));
    }

    #[test]
    fn merge_prefers_other() {
        let mut base = LevelConfig::from_directives("a=info,b=warn").unwrap();
        base.merge(LevelConfig::from_directives("b=debug").unwrap());
        assert_eq!(base.get("a"), Some(Level::Info));
        assert_eq!(base.get("b"), Some(Level::Debug));
    }
}
