//! pl0c-drv - The `pl0c` command-line driver.
//!
//! Wires the five compiler-pipeline crates together behind a single CLI:
//! parse arguments, load configuration, compile the given source file,
//! and — if it compiled cleanly — run it on the stack machine.
//!
//! Exit code tells the caller which stage, if any, failed:
//! 0 success, 1 a compile-time error, 2 a runtime error, 3 the source
//! file (or an explicitly requested config file) couldn't be read.

mod cli;
mod config;
mod driver;
mod io;

use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use cli::Cli;
pub use config::Config;
pub use driver::{compile_and_run, Outcome};
pub use io::StdIoPort;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(3);
        }
    };

    match compile_and_run(&cli.source, &config) {
        Ok(Outcome::Success) => ExitCode::from(0),
        Ok(Outcome::CompileError) => ExitCode::from(1),
        Ok(Outcome::RuntimeError) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(3)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init();
}
