//! Namespace-scoped log levels.
//!
//! Namespaces are `:`-delimited paths (`db:pool:conn`). Each may carry an
//! exact level, which applies to that namespace alone, and a cascading level,
//! set with a trailing wildcard (`db:*`), which its descendants inherit unless
//! something closer overrides it. The root namespace always has a cascading
//! level, [`DEFAULT_ROOT_LEVEL`] until changed.
//!
//! ```
//! use nslevel::{Level, Registry};
//!
//! let registry = Registry::new();
//! registry.set_log_level("db:*", Level::Error).unwrap();
//! registry.set_log_level("db:pool", Level::Debug).unwrap();
//!
//! assert!(registry.should_log(Level::Debug, "db:pool").unwrap());
//! assert!(!registry.should_log(Level::Warn, "db:query").unwrap());
//! assert!(!registry.should_log(Level::Debug, "db:pool:conn").unwrap());
//! ```

pub mod config;
pub mod error;
pub mod level;
pub mod logger;
pub mod namespace;
pub mod registry;
pub mod sink;
pub mod tree;

pub use config::LevelConfig;
pub use error::{Error, Result};
pub use level::{DEFAULT_ROOT_LEVEL, Level};
pub use logger::Logger;
pub use namespace::Namespace;
pub use registry::{Registry, create_logger, global, reset, set_log_level, should_log};
pub use sink::{ConsoleSink, Sink, TracingSink};
pub use tree::NamespaceTree;
