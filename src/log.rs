//! Logging init for the CLI (colorized, with timestamps, on stderr).

use tracing_subscriber::fmt::time::UtcTime;

/// Map a numeric verbosity (0..2) to a tracing level string.
pub fn level_from_verbosity(v: u8) -> &'static str {
    match v {
        0 => "warn",
        2 => "debug",
        _ => "info",
    }
}

/// Env filter for the tool's own diagnostics. Messages routed through the
/// tracing sink are always shown; the level tree already filtered them.
pub fn filter(level: &str, tracing_sink: bool) -> String {
    if tracing_sink {
        format!("{level},{}=debug", nslevel::sink::EMIT_TARGET)
    } else {
        level.to_string()
    }
}

/// Initialize global logging with color and RFC3339 timestamps.
/// Stdout is left to the resolution output.
pub fn init(filter: &str, tracing_sink: bool) {
    // If a global subscriber is already set, ignore errors.
    let _ = tracing_subscriber::fmt()
        // e.g. 2025-09-23T13:37:42Z
        .with_timer(UtcTime::rfc_3339())
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(tracing_sink) // shows which lines came from the sink
        .with_ansi(true)
        .with_level(true)
        .try_init();
}
