//! Output sinks for accepted log calls.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::level::Level;

/// Receives every log call a [`Logger`](crate::Logger) lets through.
///
/// `message` is the leading string argument of the call (the namespace tag
/// for non-root loggers); `args` are the values that followed it.
pub trait Sink: Send + Sync {
    fn write(&self, level: Level, message: Option<&str>, args: &[Value]);
}

impl<F> Sink for F
where
    F: Fn(Level, Option<&str>, &[Value]) + Send + Sync,
{
    fn write(&self, level: Level, message: Option<&str>, args: &[Value]) {
        self(level, message, args)
    }
}

/// Box a closure as a shareable sink.
pub fn from_fn<F>(f: F) -> Arc<dyn Sink>
where
    F: Fn(Level, Option<&str>, &[Value]) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Prints one line per call to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn render(level: Level, message: Option<&str>, args: &[Value]) -> String {
        let mut line = level.as_str().to_ascii_uppercase();
        for part in message.map(str::to_owned).into_iter().chain(args.iter().map(render_arg)) {
            line.push(' ');
            line.push_str(&part);
        }
        line
    }
}

impl Sink for ConsoleSink {
    fn write(&self, level: Level, message: Option<&str>, args: &[Value]) {
        let line = Self::render(level, message, args);
        // stderr going away is not something a log call can report
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }
}

fn render_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `tracing` target of events produced by [`TracingSink`].
pub const EMIT_TARGET: &str = "nslevel::emit";

/// Forwards calls to `tracing` under the [`EMIT_TARGET`] target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&self, level: Level, message: Option<&str>, args: &[Value]) {
        let message = message.unwrap_or_default();
        let args = Value::Array(args.to_vec());
        match level {
            Level::Off => {}
            Level::Error => tracing::error!(target: EMIT_TARGET, %args, "{message}"),
            Level::Warn => tracing::warn!(target: EMIT_TARGET, %args, "{message}"),
            Level::Info | Level::Log => tracing::info!(target: EMIT_TARGET, %args, "{message}"),
            Level::Debug => tracing::debug!(target: EMIT_TARGET, %args, "{message}"),
        }
    }
}
