use clap::{ArgAction, Parser, ValueEnum};
use nslevel::Level;

/// nslevel: resolve namespace log levels.
///
/// Builds a level tree from --config, $NSLEVEL (with --env) and --set
/// directives, then prints the effective level of every NAMESPACE and whether
/// a call at --at would be emitted there. Namespaces are resolved in parallel.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Namespaces to resolve, e.g. db:pool (none resolves the root)
    pub namespaces: Vec<String>,

    /// Path to a JSON object of levels (e.g., {"db:*": "debug", "db:pool": "warn"})
    #[arg(long = "config")]
    pub config_path: Option<String>,

    /// Level directives like "db:*=debug,db:pool=warn" (repeatable, applied last)
    #[arg(long = "set", value_name = "DIRECTIVES")]
    pub set: Vec<String>,

    /// Also read directives from $NSLEVEL
    #[arg(long = "env", action = ArgAction::SetTrue)]
    pub env: bool,

    /// Severity to check each namespace at
    #[arg(long = "at", default_value = "info")]
    pub at: Level,

    /// Send this message through each namespace's logger at the --at level
    #[arg(long = "emit")]
    pub emit: Option<String>,

    /// Where emitted messages go
    #[arg(long = "sink", value_enum, default_value_t = SinkKind::Console)]
    pub sink: SinkKind,

    /// Print one JSON object per namespace instead of a table
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Number of parallel worker threads (must be > 0)
    #[arg(long = "thread", default_value_t = 4)]
    pub threads: usize,

    /// Verbosity level: 0=warn, 1=info, 2=debug
    #[arg(long = "verbosity", default_value_t = 1)]
    pub verbosity: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    Console,
    Tracing,
    Both,
}

impl Args {
    /// Validate numeric constraints that clap doesn't enforce here.
    fn validate(&self) -> anyhow::Result<()> {
        if self.threads == 0 {
            anyhow::bail!("--thread must be > 0");
        }
        if self.verbosity > 2 {
            anyhow::bail!("--verbosity must be in 0..=2");
        }
        if self.emit.is_some() && self.at == Level::Off {
            anyhow::bail!("--emit needs an --at level other than off");
        }
        Ok(())
    }
}

/// Parse CLI args in one place so main.rs does not need clap in scope.
pub fn parse() -> Args {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("error: {}", e);
        std::process::exit(2);
    }
    args
}
