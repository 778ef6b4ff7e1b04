//! Rendering of constraint systems into source artifacts.
//!
//! A [`Template`] is plain text with `{{ name }}` placeholders. Rendering
//! fills them from a [`RenderContext`] built for the template's [`Flavor`]:
//! C for the validator program, Python with z3 for the solver script. Both
//! flavors print the same term trees, so the two artifacts of one system
//! accept exactly the same inputs.

pub mod context;
pub mod flavor;
pub mod output;
pub mod result;
pub mod template;

pub use context::{RenderContext, RenderOptions};
pub use flavor::Flavor;
pub use output::{write_artifact, write_artifacts};
pub use result::{Error, Result};
pub use template::Template;
