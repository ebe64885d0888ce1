//! Command-line surface: one positional source path, plus the ambient
//! `--config`/`--verbose` flags every driver in this shape tends to need.

use std::path::PathBuf;

use clap::Parser;

/// Compiles and runs a PL/0 source program.
#[derive(Parser, Debug)]
#[command(name = "pl0c")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles and runs a PL/0 source program", long_about = None)]
pub struct Cli {
    /// PL/0 source file to compile and run.
    pub source: PathBuf,

    /// Path to a pl0c.toml configuration file (defaults to ./pl0c.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose (debug-level) pipeline logging.
    #[arg(short, long)]
    pub verbose: bool,
}
