//! The `armor` command line interface.

pub mod commands;

use clap::Parser;
use commands::Cmd;

/// armor: obfuscated secret validators backed by constraint systems.
///
/// Generates a system of byte relations that only the secret satisfies,
/// proves it has a single solution, and renders it as a C validator or a
/// Python z3 solver script.
#[derive(Parser, Debug)]
#[command(name = "armor", version)]
#[command(about = "armor: uniquely-solvable constraint systems for secret validators")]
pub struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Cmd,
}

impl Cli {
    /// Most verbose level the logger should emit.
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}
