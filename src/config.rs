//! Run configuration for the SGD layout

use crate::error::{LayoutError, Result};
use crate::schedule::DEFAULT_EPSILON;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mixed into `seed` when no explicit shuffle seed is given
const SHUFFLE_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Configuration for a layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Dimensions of the layout space
    pub dimensions: usize,
    /// Number of learning rates in the schedule (at least 2)
    pub iterations: usize,
    /// Final step multiplier of the strongest pair, in (0, 1)
    pub epsilon: f64,
    /// Seeds initial placement and coincident-pair perturbations
    pub seed: u64,
    /// Seeds the per-iteration pair permutations; derived from `seed` if unset
    pub shuffle_seed: Option<u64>,
    /// Recenter the initial and final layouts to zero mean
    pub center: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dimensions: 2,
            iterations: 15,
            epsilon: DEFAULT_EPSILON,
            seed: 0,
            shuffle_seed: None,
            center: true,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(LayoutError::InvalidDimensions(self.dimensions));
        }
        if self.iterations < 2 {
            return Err(LayoutError::InvalidIterations(self.iterations));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(LayoutError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }

    pub fn effective_shuffle_seed(&self) -> u64 {
        self.shuffle_seed.unwrap_or(self.seed ^ SHUFFLE_SEED_MIX)
    }
}
