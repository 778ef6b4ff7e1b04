//! Seeded generation of uniquely-solvable constraint systems.
//!
//! [`ConstraintGenerator`] grows a system one random relation at a time
//! until the verifier proves the secret is its only solution, then
//! optionally prunes relations that turned out to be redundant.
//! [`pipeline::generate_artifacts`] wires generation and rendering together
//! for a single request.

pub mod generator;
pub mod pipeline;
pub mod reduce;
pub mod sampler;

pub use generator::{ConstraintGenerator, Generation, GenerationStats, GeneratorConfig};
pub use pipeline::{
    generate_artifacts, Artifact, ArtifactRequest, GenerationMetadata, GenerationRequest,
    GenerationResult, TemplateSource,
};
pub use reduce::{reduce, Reduction};
pub use sampler::{IndexSampler, ReusePolicy};

use thiserror::Error;

/// Generation error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The bounded search ran out of relations or candidate draws.
    #[error("no unique system after {relations} relations and {draws} draws")]
    GenerationExhausted { relations: usize, draws: usize },

    /// A template was written for a different secret length.
    #[error("template '{template}' expects a {expected}-byte secret, got {actual}")]
    LengthMismatch {
        template: String,
        expected: usize,
        actual: usize,
    },

    /// A generated relation does not hold on the secret, or the solver
    /// contradicted itself.
    #[error("solver internal error: {0}")]
    SolverInternal(String),

    /// A solver call hit its deadline or the run was cancelled.
    #[error("generation cancelled: {0}")]
    Cancelled(String),

    /// Any other verification failure.
    #[error("verification failed: {0}")]
    Verification(#[source] armor_verification::Error),

    /// Template loading or rendering failed.
    #[error(transparent)]
    Render(#[from] armor_render::Error),

    /// Core operation failed.
    #[error(transparent)]
    Core(#[from] armor_core::Error),
}

impl From<armor_verification::Error> for Error {
    fn from(err: armor_verification::Error) -> Self {
        match err {
            armor_verification::Error::SolverInternal(message) => Self::SolverInternal(message),
            armor_verification::Error::Cancelled(message) => Self::Cancelled(message),
            armor_verification::Error::Core(err) => Self::Core(err),
            other => Self::Verification(other),
        }
    }
}

/// Generation result type
pub type Result<T> = std::result::Result<T, Error>;
