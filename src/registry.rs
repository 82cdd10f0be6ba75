//! Shared level registry.
//!
//! [`Registry`] owns the namespace tree and the sink list behind read-write
//! locks: lookups share the tree, mutation and reset take it exclusively.
//! Most programs use the process-wide instance from [`global`].

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde_json::Value;

use crate::config::LevelConfig;
use crate::error::Result;
use crate::level::{DEFAULT_ROOT_LEVEL, Level};
use crate::logger::Logger;
use crate::namespace::{self, Namespace};
use crate::sink::{ConsoleSink, Sink};
use crate::tree::NamespaceTree;

pub struct Registry {
    tree: RwLock<NamespaceTree>,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("nodes", &self.tree.read().len())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

impl Registry {
    /// Root at [`DEFAULT_ROOT_LEVEL`], printing to the console.
    pub fn new() -> Self {
        Self::with_root_level(DEFAULT_ROOT_LEVEL)
    }

    pub fn with_root_level(root_level: Level) -> Self {
        let console: Arc<dyn Sink> = Arc::new(ConsoleSink);
        Self {
            tree: RwLock::new(NamespaceTree::new(root_level)),
            sinks: RwLock::new(vec![console]),
        }
    }

    /// See [`NamespaceTree::set_log_level`].
    pub fn set_log_level<'a>(&self, namespace: impl Into<Namespace<'a>>, level: Level) -> Result<()> {
        self.tree.write().set_log_level(namespace.into(), level)
    }

    pub fn should_log<'a>(&self, check: Level, namespace: impl Into<Namespace<'a>>) -> Result<bool> {
        self.tree.read().should_log(check, namespace.into())
    }

    pub fn effective_level<'a>(&self, namespace: impl Into<Namespace<'a>>) -> Result<Level> {
        self.tree.read().effective_level(namespace.into())
    }

    /// Discard every namespace override.
    pub fn reset(&self) {
        self.tree.write().reset();
    }

    /// Apply every entry of `config`, or none of them if any namespace is invalid.
    pub fn apply(&self, config: &LevelConfig) -> Result<()> {
        let parsed = config
            .iter()
            .map(|(ns, level)| Ok((namespace::parse(ns.into(), true)?, *level)))
            .collect::<Result<Vec<_>>>()?;

        let mut tree = self.tree.write();
        for (ns, level) in &parsed {
            tree.assign(ns, *level);
        }
        tracing::debug!(entries = parsed.len(), "applied level config");
        Ok(())
    }

    /// Snapshot of the tree, for inspection.
    pub fn tree(&self) -> NamespaceTree {
        self.tree.read().clone()
    }

    pub(crate) fn resolve(&self, segments: &[String]) -> Level {
        self.tree.read().resolve(segments)
    }

    /// A logger bound to `namespace`. Wildcards are rejected.
    pub fn logger<'a>(self: &Arc<Self>, namespace: impl Into<Namespace<'a>>) -> Result<Logger> {
        Logger::new(Arc::clone(self), namespace.into())
    }

    pub fn add_sink(&self, sink: Arc<dyn Sink>) {
        self.sinks.write().push(sink);
    }

    pub fn set_sinks(&self, sinks: Vec<Arc<dyn Sink>>) {
        *self.sinks.write() = sinks;
    }

    pub fn clear_sinks(&self) {
        self.sinks.write().clear();
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.read().len()
    }

    /// Hand one accepted call to every sink, in registration order.
    ///
    /// The sink list is snapshotted first so a sink may register further
    /// sinks without deadlocking; those only see later calls.
    pub fn dispatch(&self, level: Level, message: Option<&str>, args: &[Value]) {
        let sinks = self.sinks.read().clone();
        for sink in &sinks {
            sink.write(level, message, args);
        }
    }
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

/// The process-wide registry.
pub fn global() -> &'static Arc<Registry> {
    GLOBAL.get_or_init(|| Arc::new(Registry::new()))
}

pub fn set_log_level<'a>(namespace: impl Into<Namespace<'a>>, level: Level) -> Result<()> {
    global().set_log_level(namespace, level)
}

pub fn should_log<'a>(check: Level, namespace: impl Into<Namespace<'a>>) -> Result<bool> {
    global().should_log(check, namespace)
}

pub fn reset() {
    global().reset()
}

pub fn create_logger<'a>(namespace: impl Into<Namespace<'a>>) -> Result<Logger> {
    global().logger(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::from_fn;

    #[test]
    fn new_registry_prints_to_console() {
        let registry = Registry::new();
        assert_eq!(registry.sink_count(), 1);
        registry.clear_sinks();
        assert_eq!(registry.sink_count(), 0);
    }

    #[test]
    fn custom_root_level() {
        let registry = Registry::with_root_level(Level::Error);
        assert!(registry.should_log(Level::Error, "a").unwrap());
        assert!(!registry.should_log(Level::Warn, "a").unwrap());
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let registry = Registry::new();
        let config = LevelConfig::from_directives("a:*=debug,b::c=warn").unwrap();
        assert!(registry.apply(&config).is_err());
        assert_eq!(registry.tree().len(), 1);

        let config = LevelConfig::from_directives("a:*=debug,b:c=warn").unwrap();
        registry.apply(&config).unwrap();
        assert_eq!(registry.effective_level("a:x").unwrap(), Level::Debug);
        assert_eq!(registry.effective_level("b:c").unwrap(), Level::Warn);
        assert_eq!(registry.effective_level("b").unwrap(), DEFAULT_ROOT_LEVEL);
    }

    #[test]
    fn apply_fills_both_slots_of_one_namespace() {
        let registry = Registry::new();
        let config = LevelConfig::from_json_str(r#"{"a": "error", "a:*": "debug"}"#).unwrap();
        registry.apply(&config).unwrap();

        assert_eq!(registry.tree().len(), 2);
        assert_eq!(registry.effective_level("a").unwrap(), Level::Error);
        assert_eq!(registry.effective_level("a:b").unwrap(), Level::Debug);
    }

    #[test]
    fn dispatch_snapshot_lets_sinks_register_sinks() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let registry = Arc::new(Registry::new());
        registry.clear_sinks();
        let late_calls = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&registry);
        let counter = Arc::clone(&late_calls);
        registry.add_sink(from_fn(move |_, _, _| {
            if inner.sink_count() == 1 {
                let counter = Arc::clone(&counter);
                inner.add_sink(from_fn(move |_, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }));

        registry.dispatch(Level::Info, Some("first"), &[]);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
        registry.dispatch(Level::Info, Some("second"), &[]);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.sink_count(), 2);
    }
}
