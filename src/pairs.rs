//! Target distances and stress weights for connected node pairs

use crate::distance::DistanceMap;
use crate::error::{LayoutError, Result};

/// One connected unordered pair `i < j` with its target distance and weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairRecord {
    pub i: usize,
    pub j: usize,
    /// Shortest-path distance `d_ij > 0`
    pub dij: f64,
    /// Stress weight `1 / d_ij²`
    pub wij: f64,
}

impl PairRecord {
    pub fn new(i: usize, j: usize, dij: f64) -> Self {
        Self {
            i,
            j,
            dij,
            wij: 1.0 / (dij * dij),
        }
    }
}

/// All pair records of a graph plus the weight bounds used by the schedule
#[derive(Debug, Clone)]
pub struct PairSet {
    pub pairs: Vec<PairRecord>,
    /// `1 / d_max²`
    pub w_min: f64,
    /// `1 / d_min²`
    pub w_max: f64,
    /// Node ids in array-index order
    pub nodes: Vec<usize>,
}

impl PairSet {
    /// Collect every reachable pair `i < j` with `d_ij > 0`.
    ///
    /// Fails with [`LayoutError::DegenerateGraph`] when no such pair exists
    /// (empty or edgeless graph), since the weight bounds are then undefined.
    pub fn extract(dist: &DistanceMap) -> Result<Self> {
        let mut pairs = Vec::new();
        let mut dmin = f64::INFINITY;
        let mut dmax: f64 = 0.0;

        for (i, j, d) in dist.upper_pairs() {
            let dij = d as f64;
            if dij <= 0.0 {
                continue;
            }
            pairs.push(PairRecord::new(i, j, dij));
            dmin = dmin.min(dij);
            dmax = dmax.max(dij);
        }

        if pairs.is_empty() {
            return Err(LayoutError::DegenerateGraph);
        }

        Ok(Self {
            pairs,
            w_min: 1.0 / (dmax * dmax),
            w_max: 1.0 / (dmin * dmin),
            nodes: (0..dist.node_count()).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
