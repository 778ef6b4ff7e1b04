//! One request in, rendered artifacts out.

use crate::generator::{ConstraintGenerator, GeneratorConfig};
use crate::{Error, Result};
use armor_core::{ConstraintSystem, Secret, Seed};
use armor_render::{write_artifact, Flavor, RenderContext, RenderOptions, Template};
use armor_verification::{Cancellation, Solver};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Where a template is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    /// A compiled-in template, by name.
    Builtin(String),
    /// A template file; the flavor is inferred from the extension if absent.
    Path {
        path: PathBuf,
        flavor: Option<Flavor>,
    },
}

impl TemplateSource {
    pub fn load(&self) -> Result<Template> {
        let template = match self {
            Self::Builtin(name) => Template::builtin(name)?,
            Self::Path { path, flavor } => Template::from_path(path, *flavor)?,
        };
        Ok(template)
    }
}

/// One artifact to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRequest {
    pub template: TemplateSource,
    /// Destination file; `None` leaves the artifact to the caller.
    pub output: Option<PathBuf>,
}

/// Everything needed for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub secret: Secret,
    pub seed: Seed,
    pub generator: GeneratorConfig,
    pub render: RenderOptions,
    pub artifacts: Vec<ArtifactRequest>,
    /// Raised from another thread to abandon the run.
    pub cancel: Cancellation,
}

impl GenerationRequest {
    /// A request with default settings for one artifact.
    pub fn new(secret: Secret, seed: Seed, template: TemplateSource) -> Self {
        Self {
            secret,
            seed,
            generator: GeneratorConfig::default(),
            render: RenderOptions::default(),
            artifacts: vec![ArtifactRequest {
                template,
                output: None,
            }],
            cancel: Cancellation::default(),
        }
    }
}

/// A rendered artifact.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub template: String,
    pub flavor: Flavor,
    pub output: Option<PathBuf>,
    pub text: String,
}

impl Artifact {
    /// Writes the artifact to its requested output. Returns the path, or
    /// `None` when no output was requested.
    pub fn write(&self) -> Result<Option<&Path>> {
        match &self.output {
            Some(path) => {
                write_artifact(path, &self.text)?;
                Ok(Some(path.as_path()))
            }
            None => Ok(None),
        }
    }
}

/// Facts about a run, for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// Seed in 0x-prefixed hex.
    pub seed: String,
    pub seed_hash: String,
    pub secret_length: usize,
    pub solver: String,
    pub reuse_policy: String,
    pub relations: usize,
    pub relations_generated: usize,
    pub relations_removed: usize,
    pub draws: usize,
    pub rejected: usize,
    pub verifications: usize,
    /// Accepted relations per kind name.
    pub kinds: BTreeMap<String, usize>,
    pub elapsed_ms: u64,
}

/// Output of [`generate_artifacts`].
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub system: ConstraintSystem,
    pub artifacts: Vec<Artifact>,
    pub metadata: GenerationMetadata,
}

impl GenerationResult {
    /// JSON report with the metadata and the generated system.
    pub fn report(&self) -> serde_json::Value {
        json!({
            "metadata": &self.metadata,
            "system": &self.system,
        })
    }
}

/// Generates a unique system for the request and renders every artifact.
///
/// Template sizes are checked before any generation work, and nothing is
/// written to disk here: a failed request leaves no partial output.
pub fn generate_artifacts(
    request: &GenerationRequest,
    solver: &dyn Solver,
) -> Result<GenerationResult> {
    let started = Instant::now();
    let size = request.secret.len();

    let templates = request
        .artifacts
        .iter()
        .map(|artifact| artifact.template.load())
        .collect::<Result<Vec<_>>>()?;
    for template in &templates {
        match template.expected_size() {
            Some(expected) if expected != size => {
                return Err(Error::LengthMismatch {
                    template: template.name().to_string(),
                    expected,
                    actual: size,
                })
            }
            _ => {}
        }
    }

    info!(
        seed = %request.seed,
        solver = solver.name(),
        "generating constraints for a {size}-byte secret"
    );
    let mut rng = request.seed.create_deterministic_rng();
    let generation = ConstraintGenerator::new(&request.generator, solver)
        .with_cancellation(request.cancel.clone())
        .generate(&request.secret, &mut rng)?;

    let artifacts = templates
        .iter()
        .zip(&request.artifacts)
        .map(|(template, artifact)| {
            let context =
                RenderContext::new(template.flavor(), &generation.system, &request.render)
                    .with_seed(&request.seed);
            Ok(Artifact {
                template: template.name().to_string(),
                flavor: template.flavor(),
                output: artifact.output.clone(),
                text: template.render(&context)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut kinds = BTreeMap::new();
    for relation in generation.system.relations() {
        *kinds.entry(relation.kind().name().to_string()).or_insert(0) += 1;
    }
    let stats = &generation.stats;
    let metadata = GenerationMetadata {
        seed: request.seed.to_hex(),
        seed_hash: request.seed.hash_hex(),
        secret_length: size,
        solver: solver.name().to_string(),
        reuse_policy: request.generator.reuse_policy.to_string(),
        relations: generation.system.len(),
        relations_generated: stats.relations_generated,
        relations_removed: stats.relations_removed,
        draws: stats.draws,
        rejected: stats.rejected,
        verifications: stats.verifications,
        kinds,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    info!(
        relations = metadata.relations,
        artifacts = artifacts.len(),
        elapsed_ms = metadata.elapsed_ms,
        "generation finished"
    );

    Ok(GenerationResult {
        system: generation.system,
        artifacts,
        metadata,
    })
}
