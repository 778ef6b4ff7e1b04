//! Module for the `solve` subcommand, which loads a saved constraint system
//! and enumerates its solutions.

use crate::commands::SolverArgs;
use armor_core::ConstraintSystem;
use armor_verification::enumerate_solutions;
use async_trait::async_trait;
use clap::Args;
use std::error::Error;
use std::path::PathBuf;
use tracing::warn;

/// Arguments for the `solve` subcommand.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Constraint system JSON, as written by `armor generate --save-system`.
    pub system: PathBuf,
    /// Stop after this many solutions.
    #[arg(long, default_value_t = 2)]
    pub limit: usize,
    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Executes the `solve` subcommand.
#[async_trait]
impl super::Command for SolveArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let json = tokio::fs::read_to_string(&self.system).await?;
        let system: ConstraintSystem = serde_json::from_str(&json)?;
        let solver = self.solver.build()?;
        if self.limit < 2 {
            warn!("a limit below 2 cannot tell whether the system is unique");
        }

        let limit = self.limit.max(1);
        let solutions = tokio::task::spawn_blocking(move || {
            enumerate_solutions(solver.as_ref(), &system, limit)
        })
        .await??;

        for solution in &solutions {
            println!("{}", solution.escape_ascii());
        }
        println!("{}", summary(solutions.len(), limit));
        Ok(())
    }
}

fn summary(found: usize, limit: usize) -> String {
    match found {
        0 => "unsatisfiable".to_string(),
        1 if limit == 1 => "satisfiable".to_string(),
        1 => "unique".to_string(),
        n if n < limit => format!("{n} solutions"),
        n => format!("at least {n} solutions"),
    }
}
