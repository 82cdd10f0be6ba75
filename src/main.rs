use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use nslevel::{ConsoleSink, Level, LevelConfig, Registry, Sink, TracingSink};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

mod args;
mod log;

use args::{Args, SinkKind};

#[derive(Debug, Serialize)]
struct Resolution {
    namespace: String,
    level: Level,
    at: Level,
    enabled: bool,
}

fn main() -> anyhow::Result<()> {
    let args = args::parse();

    let tracing_sink = args.sink != SinkKind::Console;
    log::init(
        &log::filter(log::level_from_verbosity(args.verbosity), tracing_sink),
        tracing_sink,
    );

    let config = load_config(&args)?;
    let registry = Arc::new(Registry::new());
    registry.set_sinks(sinks(args.sink));
    registry
        .apply(&config)
        .context("invalid namespace in level config")?;
    info!("applied {} level entries", config.len());

    let namespaces = if args.namespaces.is_empty() {
        vec![String::new()]
    } else {
        args.namespaces.clone()
    };
    if args.emit.is_some() && namespaces.len() > 1 {
        warn!("emitting from {} loggers in parallel; line order is not stable", namespaces.len());
    }

    let results: Vec<nslevel::Result<Resolution>> = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()?
        .install(|| {
            namespaces
                .par_iter()
                .map(|ns| resolve(&registry, ns, args.at, args.emit.as_deref()))
                .collect()
        });

    let mut out = io::stdout().lock();
    let mut err_count = 0usize;
    for (ns, result) in namespaces.iter().zip(&results) {
        match result {
            Ok(resolution) if args.json => {
                writeln!(out, "{}", serde_json::to_string(resolution)?)?;
            }
            Ok(r) => {
                let verdict = if r.enabled { "emit" } else { "drop" };
                writeln!(out, "{}\t{}\t{} at {}", r.namespace, r.level, verdict, r.at)?;
            }
            Err(e) => {
                error!("{ns}: {e}");
                err_count += 1;
            }
        }
    }

    if err_count > 0 {
        error!("done with errors: ok={}, err={}", results.len() - err_count, err_count);
        std::process::exit(1);
    } else {
        debug!("done: resolved {} namespaces", results.len());
    }

    Ok(())
}

/// --config first, then $NSLEVEL, then --set; later entries win.
fn load_config(args: &Args) -> anyhow::Result<LevelConfig> {
    let mut config = LevelConfig::new();
    if let Some(path) = &args.config_path {
        info!("loading level config: {path}");
        config.merge(LevelConfig::from_path(path)?);
    }
    if args.env {
        let from_env = LevelConfig::from_default_env()
            .with_context(|| format!("invalid ${}", nslevel::config::DEFAULT_ENV))?;
        debug!("{} entries from ${}", from_env.len(), nslevel::config::DEFAULT_ENV);
        config.merge(from_env);
    }
    for directives in &args.set {
        config.merge(LevelConfig::from_directives(directives)?);
    }
    if config.is_empty() {
        debug!("no level entries; every namespace resolves to {}", nslevel::DEFAULT_ROOT_LEVEL);
    }
    Ok(config)
}

fn sinks(kind: SinkKind) -> Vec<Arc<dyn Sink>> {
    let mut sinks: Vec<Arc<dyn Sink>> = Vec::with_capacity(2);
    if matches!(kind, SinkKind::Console | SinkKind::Both) {
        sinks.push(Arc::new(ConsoleSink));
    }
    if matches!(kind, SinkKind::Tracing | SinkKind::Both) {
        sinks.push(Arc::new(TracingSink));
    }
    sinks
}

fn resolve(
    registry: &Arc<Registry>,
    namespace: &str,
    at: Level,
    emit: Option<&str>,
) -> nslevel::Result<Resolution> {
    let level = registry.effective_level(namespace)?;
    if let Some(message) = emit {
        registry
            .logger(namespace)?
            .log_at(at, &[Value::from(message)]);
    }
    Ok(Resolution {
        namespace: if namespace.is_empty() {
            nslevel::namespace::ROOT_KEY.to_string()
        } else {
            namespace.to_string()
        },
        level,
        at,
        enabled: at.emits(level),
    })
}
