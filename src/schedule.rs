//! Annealed learning-rate schedule
//!
//! Rates decay geometrically from `η_max = 1 / w_min` to `η_min = ε / w_max`.
//! At `η_max` the weakest pair's step multiplier `w_min·η` is exactly 1;
//! at `η_min` the strongest pair's multiplier is `ε`.

use crate::error::{LayoutError, Result};

/// Default decay tolerance
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Monotonically decreasing learning rates, one per optimization iteration
#[derive(Debug, Clone, PartialEq)]
pub struct LearningRateSchedule {
    etas: Vec<f64>,
}

impl LearningRateSchedule {
    pub fn new(iterations: usize, w_min: f64, w_max: f64, epsilon: f64) -> Result<Self> {
        if iterations < 2 {
            return Err(LayoutError::InvalidIterations(iterations));
        }
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(LayoutError::InvalidEpsilon(epsilon));
        }
        if !(w_min > 0.0 && w_max >= w_min && w_max.is_finite()) {
            return Err(LayoutError::InvalidWeightBounds { w_min, w_max });
        }

        let eta_max = 1.0 / w_min;
        let eta_min = epsilon / w_max;
        let lambda = (eta_max / eta_min).ln() / (iterations - 1) as f64;

        let etas = (0..iterations)
            .map(|t| eta_max * (-lambda * t as f64).exp())
            .collect();

        Ok(Self { etas })
    }

    pub fn etas(&self) -> &[f64] {
        &self.etas
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.etas.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.etas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.etas.is_empty()
    }

    /// η_max
    pub fn first(&self) -> f64 {
        self.etas[0]
    }

    /// η_min
    pub fn last(&self) -> f64 {
        self.etas[self.etas.len() - 1]
    }
}
