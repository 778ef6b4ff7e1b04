use armor_verification::{Cancellation, Solver, SolverBackend, SolverConfig};
use async_trait::async_trait;
use clap::{Args, Subcommand};
use std::error::Error;
use std::time::Duration;

pub mod generate;
pub mod solve;
pub mod templates;

use thiserror::Error;

/// Errors raised by the command layer itself.
#[derive(Debug, Error)]
pub enum CliError {
    /// Stdin closed before a secret line was read.
    #[error("no secret given: pass --secret or provide it on stdin")]
    NoSecret,
    /// More output paths than templates.
    #[error("{outputs} output paths given for {templates} templates")]
    TooManyOutputs { outputs: usize, templates: usize },
    /// The whole generation exceeded `--timeout`.
    #[error("generation timed out after {0}s")]
    Timeout(u64),
    /// The blocking worker panicked or was cancelled.
    #[error("generation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// File read/write error.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// CLI subcommands for armor.
#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Generate a unique constraint system for a secret and render it.
    Generate(generate::GenerateArgs),
    /// Enumerate the solutions of a saved constraint system.
    Solve(solve::SolveArgs),
    /// List the built-in templates.
    Templates(templates::TemplatesArgs),
}

/// Trait for executing CLI subcommands.
#[async_trait]
pub trait Command {
    /// Executes the subcommand.
    async fn execute(self) -> Result<(), Box<dyn Error>>;
}

#[async_trait]
impl Command for Cmd {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Generate(args) => args.execute().await,
            Cmd::Solve(args) => args.execute().await,
            Cmd::Templates(args) => args.execute().await,
        }
    }
}

/// Solver selection shared by the subcommands that query a solver.
#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Solver backend: `search` (built in) or `z3` (requires the z3 feature).
    #[arg(long = "solver", default_value = "search", value_parser = parse_backend)]
    pub backend: SolverBackend,
    /// Deadline for each individual solver call, in milliseconds.
    #[arg(long = "solver-timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

impl SolverArgs {
    pub fn build(&self) -> Result<Box<dyn Solver + Send + Sync>, armor_verification::Error> {
        self.build_with(Cancellation::default())
    }

    /// Builds a solver that stops once `cancel` is raised.
    pub fn build_with(
        &self,
        cancel: Cancellation,
    ) -> Result<Box<dyn Solver + Send + Sync>, armor_verification::Error> {
        let config = SolverConfig {
            timeout: self.timeout_ms.map(Duration::from_millis),
            cancel,
        };
        self.backend.build(config)
    }
}

fn parse_backend(name: &str) -> Result<SolverBackend, String> {
    match name {
        "search" => Ok(SolverBackend::Search),
        "z3" => Ok(SolverBackend::Z3),
        other => Err(format!("unknown solver '{other}', expected search or z3")),
    }
}
