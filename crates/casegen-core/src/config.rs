//! Engine construction parameters.

use casegen_ir::DomainLimits;
use serde::{Deserialize, Serialize};

use crate::engine::EngineError;

/// Settings fixed for the lifetime of one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed string for the pseudo-random source, typically a run identifier.
    pub seed: String,
    /// Attempts made to find a non-matching or non-member value.
    pub random_tries_to_invalid_value: usize,
    /// Extra repetitions allowed for unbounded quantifiers (`*`, `+`, `{n,}`).
    pub max_repetition: u32,
    pub limits: DomainLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            random_tries_to_invalid_value: 10,
            max_repetition: 8,
            limits: DomainLimits::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Self::default()
        }
    }

    /// Load from JSON; absent keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }
}
