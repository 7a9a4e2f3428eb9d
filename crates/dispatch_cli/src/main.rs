//! Dispatcher console entry point.
//!
//! # Responsibility
//! - Parse start-up flags, initialize logging, build the store.
//! - Feed stdin lines to the console until `quit` or end of input.

mod command;
mod console;

use clap::Parser;
use command::parse_command;
use console::{Console, Flow};
use dispatch_core::{
    default_log_level, init_logging, DispatchStore, InMemoryDispatchRepository, StoreConfig,
};
use log::info;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Emergency dispatch console over an in-memory store.
#[derive(Debug, Parser)]
#[command(name = "dispatch", version)]
struct Args {
    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Seed for reproducible ETAs.
    #[arg(long)]
    eta_seed: Option<u64>,

    /// Start without the demo dataset.
    #[arg(long)]
    empty: bool,

    /// Print the final emergencies and responders as JSON on exit.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = StoreConfig {
        eta_seed: args.eta_seed,
    };
    let store = if args.empty {
        DispatchStore::new(InMemoryDispatchRepository::new()).with_eta_source(config.eta_source())
    } else {
        DispatchStore::seeded(&config)?
    };
    let mut console = Console::new(store);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "dispatch console {}; type `help` for commands",
        dispatch_core::core_version()
    )?;

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Some(command)) => {
                if console.execute(command, &mut out)? == Flow::Stop {
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => writeln!(out, "error: {err}")?,
        }
        out.flush()?;
    }

    if args.json {
        let snapshot = serde_json::json!({
            "emergencies": console.store().emergencies(),
            "responders": console.store().responders(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
    }

    let summary = console.store().summary();
    info!(
        "event=session_end module=cli status=ok pending={} active={} resolved={}",
        summary.pending, summary.active, summary.resolved
    );
    Ok(())
}
