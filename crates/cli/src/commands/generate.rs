//! Module for the `generate` subcommand, which builds a uniquely-solvable
//! constraint system for a secret and renders it through one or more
//! templates.

use crate::commands::{CliError, SolverArgs};
use armor_core::{Secret, Seed};
use armor_generator::{
    generate_artifacts, ArtifactRequest, GenerationRequest, GeneratorConfig, ReusePolicy,
    TemplateSource,
};
use armor_render::{write_artifacts, RenderOptions};
use armor_verification::Cancellation;
use async_trait::async_trait;
use clap::{ArgGroup, Args};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("template_source")
        .required(true)
        .multiple(true)
        .args(["templates", "template_paths"])
))]
pub struct GenerateArgs {
    /// Secret to protect. Read from the first line of stdin when absent.
    #[arg(short = 'p', long)]
    pub secret: Option<Secret>,
    /// Seed for deterministic generation: a decimal integer or 0x-prefixed
    /// 64 digit hex. A random seed is generated and logged when absent.
    #[arg(short, long, allow_negative_numbers = true)]
    pub seed: Option<Seed>,
    /// Built-in template to render (see `armor templates`). Repeatable.
    #[arg(long = "template", value_name = "NAME")]
    pub templates: Vec<String>,
    /// Template file to render; .c/.h files render validators, .py files
    /// render solvers. Repeatable.
    #[arg(long = "template-path", value_name = "PATH")]
    pub template_paths: Vec<PathBuf>,
    /// Output file for each template in order, built-in templates first.
    /// Templates without an output are printed to stdout.
    #[arg(short, long = "output", value_name = "PATH")]
    pub outputs: Vec<PathBuf>,
    /// Relations to accumulate before the first uniqueness check.
    #[arg(long = "min", default_value_t = 1)]
    pub min_relations: usize,
    /// Maximum number of relations before giving up.
    #[arg(long = "max")]
    pub max_relations: Option<usize>,
    /// Consecutive rejected candidates tolerated per relation.
    #[arg(long = "draws", default_value_t = 256)]
    pub max_draws: usize,
    /// Operand reuse policy: uniform, balanced or fresh.
    #[arg(long, default_value_t = ReusePolicy::Balanced)]
    pub reuse: ReusePolicy,
    /// Keep relations that are not needed for uniqueness.
    #[arg(long)]
    pub no_reduce: bool,
    #[command(flatten)]
    pub solver: SolverArgs,
    /// Overall deadline for generation, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Message printed by the validator on success.
    #[arg(long)]
    pub success: Option<String>,
    /// Message printed by the validator on failure.
    #[arg(long)]
    pub failure: Option<String>,
    /// Path to emit a JSON report of the run (optional).
    #[arg(long, value_name = "PATH")]
    pub emit: Option<PathBuf>,
    /// Path to save the generated system as JSON, for `armor solve`.
    #[arg(long, value_name = "PATH")]
    pub save_system: Option<PathBuf>,
}

impl GenerateArgs {
    /// Builds the request, pairing outputs with templates in order.
    pub fn request(&self, secret: Secret, seed: Seed) -> Result<GenerationRequest, CliError> {
        let sources: Vec<TemplateSource> = self
            .templates
            .iter()
            .cloned()
            .map(TemplateSource::Builtin)
            .chain(self.template_paths.iter().map(|path| TemplateSource::Path {
                path: path.clone(),
                flavor: None,
            }))
            .collect();
        if self.outputs.len() > sources.len() {
            return Err(CliError::TooManyOutputs {
                outputs: self.outputs.len(),
                templates: sources.len(),
            });
        }

        let mut outputs = self.outputs.iter().cloned();
        let artifacts = sources
            .into_iter()
            .map(|template| ArtifactRequest {
                template,
                output: outputs.next(),
            })
            .collect();

        let defaults = RenderOptions::default();
        Ok(GenerationRequest {
            secret,
            seed,
            generator: GeneratorConfig {
                min_relations: self.min_relations,
                max_relations: self.max_relations,
                max_draws_per_relation: self.max_draws,
                reuse_policy: self.reuse,
                reduce: !self.no_reduce,
            },
            render: RenderOptions {
                success: self.success.clone().unwrap_or(defaults.success),
                failure: self.failure.clone().unwrap_or(defaults.failure),
            },
            artifacts,
            cancel: Cancellation::default(),
        })
    }
}

/// Executes the `generate` subcommand.
#[async_trait]
impl super::Command for GenerateArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        let secret = match &self.secret {
            Some(secret) => secret.clone(),
            None => read_secret().await?,
        };
        let seed = match &self.seed {
            Some(seed) => seed.clone(),
            None => {
                let seed = Seed::generate();
                info!("generated seed {seed}");
                seed
            }
        };

        let request = self.request(secret, seed)?;
        let cancel = request.cancel.clone();
        let solver = self.solver.build_with(cancel.clone())?;

        let mut task =
            tokio::task::spawn_blocking(move || generate_artifacts(&request, solver.as_ref()));
        let joined = match self.timeout {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), &mut task).await {
                Ok(joined) => joined,
                Err(_) => {
                    cancel.cancel();
                    // The worker stops at its next cancellation check.
                    let _ = task.await;
                    return Err(CliError::Timeout(secs).into());
                }
            },
            None => task.await,
        };
        let result = joined.map_err(CliError::from)??;

        let report = match &self.emit {
            Some(_) => Some(serde_json::to_string_pretty(&result.report())?),
            None => None,
        };
        let system = match &self.save_system {
            Some(_) => Some(serde_json::to_string_pretty(&result.system)?),
            None => None,
        };

        let mut files: Vec<(&Path, &str)> = result
            .artifacts
            .iter()
            .filter_map(|artifact| Some((artifact.output.as_deref()?, artifact.text.as_str())))
            .collect();
        files.extend(self.emit.as_deref().zip(report.as_deref()));
        files.extend(self.save_system.as_deref().zip(system.as_deref()));
        write_artifacts(&files)?;

        for artifact in &result.artifacts {
            match &artifact.output {
                Some(path) => info!("wrote {} to {}", artifact.template, path.display()),
                None => print!("{}", artifact.text),
            }
        }
        if let Some(path) = &self.emit {
            info!("wrote report to {}", path.display());
        }
        if let Some(path) = &self.save_system {
            info!("saved constraint system to {}", path.display());
        }

        Ok(())
    }
}

/// Reads the secret from the first line of stdin.
async fn read_secret() -> Result<Secret, Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let line = lines.next_line().await?.ok_or(CliError::NoSecret)?;
    Ok(Secret::new(line.trim_end_matches('\r'))?)
}
