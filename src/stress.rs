//! Layout quality metrics

use crate::coordinates::Positions;
use crate::distance::DistanceMap;
use crate::error::{LayoutError, Result};
use crate::graph::Graph;

/// Which stress sum to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StressMetric {
    /// `Σ ½ · (1/d²) · (|x_u - x_v| - d)²`, the objective the optimizer minimizes
    #[default]
    Weighted,
    /// `Σ (|x_u - x_v| - d)²` without weights
    Raw,
}

/// Weighted stress of a layout. Distances are recomputed from `graph`.
pub fn compute_stress(graph: &Graph, positions: &Positions) -> Result<f64> {
    stress_with(&DistanceMap::from_graph(graph), positions, StressMetric::Weighted)
}

/// Stress over every reachable unordered pair of `dist`.
///
/// Pairs in different components contribute nothing.
pub fn stress_with(dist: &DistanceMap, positions: &Positions, metric: StressMetric) -> Result<f64> {
    let mut total = 0.0;

    for (u, v, d) in dist.upper_pairs() {
        if d == 0 {
            continue;
        }
        for node in [u, v] {
            if positions.get(node).is_none() {
                return Err(LayoutError::MissingPosition { node });
            }
        }

        let dij = d as f64;
        let residual = positions.distance(u, v) - dij;
        total += match metric {
            StressMetric::Weighted => 0.5 * residual * residual / (dij * dij),
            StressMetric::Raw => residual * residual,
        };
    }

    Ok(total)
}
