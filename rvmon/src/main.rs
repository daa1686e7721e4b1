//! rvmon - Interactive monitor for a simulated rv32 machine.
//!
//! This is the entry point for the rvmon binary. It parses the command
//! line, initializes logging, loads the configuration and the guest
//! image, then either evaluates a single expression, runs the guest in
//! batch mode, or enters the interactive prompt.

mod config;
mod error;
mod repl;
mod selftest;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rvmon_machine::{EmuState, Machine, Memory};
use rvmon_sdb::Debugger;

use config::Config;
use error::{MonitorError, Result};

/// rvmon - inspect, step and watch a simulated rv32 machine
#[derive(Parser, Debug)]
#[command(name = "rvmon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive monitor and debugger for a simulated rv32 machine", long_about = None)]
struct Cli {
    /// Guest memory image (flat binary); the built-in image is used
    /// when omitted
    image: Option<PathBuf>,

    /// Run the guest to completion instead of entering the prompt
    #[arg(short, long)]
    batch: bool,

    /// Evaluate EXPR against the initial machine state and exit
    #[arg(short, long, value_name = "EXPR")]
    eval: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "RVMON_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, env = "RVMON_VERBOSE")]
    verbose: bool,

    /// Disable color output
    #[arg(long, env = "RVMON_NO_COLOR")]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(cli.verbose || config.verbose, cli.no_color)?;

    let mut dbg = build_debugger(&cli, &config)?;

    if let Some(expr) = &cli.eval {
        let value = dbg.eval(expr)?;
        println!("{value:#x}\t{value}");
        return Ok(());
    }

    if cli.batch {
        let hits = dbg.exec(u64::MAX);
        for hit in &hits {
            println!("Watchpoint {}: {}", hit.id, hit.expr);
        }
        if let EmuState::End { pc, code } = dbg.machine().state {
            println!("Guest program ended with code {code} at pc {pc:#010x}");
        }
        return Ok(());
    }

    repl::Repl::new(dbg, config.repl.prompt.clone()).run()?;
    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| MonitorError::Config(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}

/// Load configuration from an explicit file or the default locations.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Build the debugger around guest memory seeded from the image file,
/// or from the built-in image when none was given.
fn build_debugger(cli: &Cli, config: &Config) -> anyhow::Result<Debugger> {
    let mut mem = Memory::new(config.memory.base, config.memory.size);
    match &cli.image {
        Some(path) => {
            let image = std::fs::read(path)
                .with_context(|| format!("failed to read image '{}'", path.display()))?;
            let base = mem.base();
            mem.load_image(base, &image).map_err(MonitorError::from)?;
        }
        None => mem.load_builtin_image(),
    }
    Ok(Debugger::new(Machine::new(mem)))
}
