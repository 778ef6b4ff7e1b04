//! Placeholder values for one render of a constraint system.

use crate::flavor::Flavor;
use armor_core::{ConstraintSystem, Seed};
use serde::{Deserialize, Serialize};

/// Messages printed by generated programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub success: String,
    pub failure: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            success: "Correct! You found the secret.".to_string(),
            failure: "Wrong secret, try again.".to_string(),
        }
    }
}

/// Everything a template may refer to, already in the target syntax.
///
/// Built once per template from a finished constraint system.
#[derive(Debug, Clone)]
pub struct RenderContext {
    flavor: Flavor,
    size: usize,
    relation_count: usize,
    declarations: String,
    variables: String,
    predicate: String,
    assertions: String,
    success: String,
    failure: String,
    seed: Option<String>,
}

impl RenderContext {
    pub fn new(flavor: Flavor, system: &ConstraintSystem, options: &RenderOptions) -> Self {
        Self {
            flavor,
            size: system.size(),
            relation_count: system.len(),
            declarations: flavor.declarations(system.size()),
            variables: Flavor::variables(system.size()),
            predicate: flavor.predicate(system),
            assertions: flavor.assertions(system),
            success: flavor.escape(&options.success),
            failure: flavor.escape(&options.failure),
            seed: None,
        }
    }

    /// Records the generation seed for the `seed` placeholder.
    pub fn with_seed(mut self, seed: &Seed) -> Self {
        self.seed = Some(seed.to_hex());
        self
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Value substituted for `{{ placeholder }}`, if any.
    pub fn value(&self, placeholder: &str) -> Option<String> {
        let value = match placeholder {
            "size" => self.size.to_string(),
            "relation_count" => self.relation_count.to_string(),
            "declarations" => self.declarations.clone(),
            "variables" => self.variables.clone(),
            "predicate" => self.predicate.clone(),
            "assertions" => self.assertions.clone(),
            "success" => self.success.clone(),
            "failure" => self.failure.clone(),
            "seed" => self.seed.clone()?,
            _ => return None,
        };
        Some(value)
    }
}
