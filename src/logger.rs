//! Loggers bound to one namespace.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::level::Level;
use crate::namespace::{self, Namespace};
use crate::registry::Registry;

/// Severity used by [`Logger::call`].
pub const DEFAULT_CALL_LEVEL: Level = Level::Log;

/// A handle that checks its namespace's level before every call and fans
/// accepted calls out to the registry's sinks.
///
/// Calls from a non-root logger carry a `[namespace]` tag as their first
/// argument. Whatever string comes first becomes the sink's `message`.
#[derive(Clone)]
pub struct Logger {
    registry: Arc<Registry>,
    namespace: String,
    segments: Vec<String>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl Logger {
    pub(crate) fn new(registry: Arc<Registry>, namespace: Namespace<'_>) -> Result<Self> {
        let parsed = namespace::parse(namespace, false)?;
        Ok(Self {
            registry,
            namespace: namespace.to_string(),
            segments: parsed.segments,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether a call at `level` would currently reach the sinks.
    pub fn enabled(&self, level: Level) -> bool {
        level.emits(self.registry.resolve(&self.segments))
    }

    pub fn log_at(&self, level: Level, args: &[Value]) {
        if !self.enabled(level) {
            return;
        }

        let mut values = Vec::with_capacity(args.len() + 1);
        if !self.is_root() {
            values.push(Value::String(format!("[{}]", self.namespace)));
        }
        values.extend_from_slice(args);

        match values.split_first() {
            Some((Value::String(message), rest)) => {
                self.registry.dispatch(level, Some(message.as_str()), rest)
            }
            _ => self.registry.dispatch(level, None, &values),
        }
    }

    /// Log at [`DEFAULT_CALL_LEVEL`].
    pub fn call(&self, args: &[Value]) {
        self.log_at(DEFAULT_CALL_LEVEL, args)
    }

    pub fn error(&self, args: &[Value]) {
        self.log_at(Level::Error, args)
    }

    pub fn warn(&self, args: &[Value]) {
        self.log_at(Level::Warn, args)
    }

    pub fn info(&self, args: &[Value]) {
        self.log_at(Level::Info, args)
    }

    pub fn log(&self, args: &[Value]) {
        self.log_at(Level::Log, args)
    }

    pub fn debug(&self, args: &[Value]) {
        self.log_at(Level::Debug, args)
    }
}
