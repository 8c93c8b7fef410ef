//! Position assignments: one point in D-dimensional Euclidean space per node
//!
//! Points live in a flat row-major buffer indexed by node id, so node `k`
//! occupies `coords[k * dimensions .. (k + 1) * dimensions]`.

use crate::error::{LayoutError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Euclidean norm of a vector
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Node positions for a single layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPositions")]
pub struct Positions {
    dimensions: usize,
    coords: Vec<f64>,
}

/// Unchecked wire form of [`Positions`]
#[derive(Deserialize)]
struct RawPositions {
    dimensions: usize,
    coords: Vec<f64>,
}

impl TryFrom<RawPositions> for Positions {
    type Error = LayoutError;

    fn try_from(raw: RawPositions) -> Result<Self> {
        let ragged = match raw.dimensions {
            0 => !raw.coords.is_empty(),
            d => raw.coords.len() % d != 0,
        };
        if ragged {
            return Err(LayoutError::MalformedPositions {
                dimensions: raw.dimensions,
                len: raw.coords.len(),
            });
        }
        Ok(Self {
            dimensions: raw.dimensions,
            coords: raw.coords,
        })
    }
}

impl Positions {
    /// All nodes at the origin
    pub fn zeros(node_count: usize, dimensions: usize) -> Self {
        Self {
            dimensions,
            coords: vec![0.0; node_count * dimensions],
        }
    }

    /// Independent uniform `[0, 1)` coordinates
    pub fn random_uniform<R: Rng + ?Sized>(node_count: usize, dimensions: usize, rng: &mut R) -> Self {
        let coords = (0..node_count * dimensions).map(|_| rng.gen::<f64>()).collect();
        Self { dimensions, coords }
    }

    /// Build from per-node points; every point must have the same length.
    pub fn from_points(points: Vec<Vec<f64>>) -> Result<Self> {
        let dimensions = points.first().map(Vec::len).unwrap_or(0);
        let mut coords = Vec::with_capacity(points.len() * dimensions);
        for p in points {
            if p.len() != dimensions {
                return Err(LayoutError::DimensionMismatch {
                    expected: dimensions,
                    found: p.len(),
                });
            }
            coords.extend(p);
        }
        Ok(Self { dimensions, coords })
    }

    /// Build from a node-id keyed map covering nodes `0..node_count`.
    pub fn from_map(map: &BTreeMap<usize, Vec<f64>>, node_count: usize) -> Result<Self> {
        let points = (0..node_count)
            .map(|node| {
                map.get(&node)
                    .cloned()
                    .ok_or(LayoutError::MissingPosition { node })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_points(points)
    }

    /// Node id keyed copy of every point
    pub fn to_map(&self) -> BTreeMap<usize, Vec<f64>> {
        self.iter()
            .enumerate()
            .map(|(node, p)| (node, p.to_vec()))
            .collect()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of nodes with a position
    pub fn len(&self) -> usize {
        if self.dimensions == 0 {
            0
        } else {
            self.coords.len() / self.dimensions
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, node: usize) -> Option<&[f64]> {
        if self.dimensions == 0 {
            return None;
        }
        let start = node.checked_mul(self.dimensions)?;
        self.coords.get(start..start + self.dimensions)
    }

    /// Panics if `node` has no position.
    pub fn point(&self, node: usize) -> &[f64] {
        let start = node * self.dimensions;
        &self.coords[start..start + self.dimensions]
    }

    pub fn point_mut(&mut self, node: usize) -> &mut [f64] {
        let start = node * self.dimensions;
        &mut self.coords[start..start + self.dimensions]
    }

    pub fn set_point(&mut self, node: usize, point: &[f64]) {
        self.point_mut(node).copy_from_slice(point);
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.coords.chunks_exact(self.dimensions.max(1))
    }

    /// Flat row-major coordinate buffer
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// Euclidean distance between two nodes
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.point(a)
            .iter()
            .zip(self.point(b))
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }

    /// Per-dimension mean of all points
    pub fn mean(&self) -> Vec<f64> {
        let n = self.len();
        let mut mean = vec![0.0; self.dimensions];
        if n == 0 {
            return mean;
        }
        for p in self.iter() {
            for (m, x) in mean.iter_mut().zip(p) {
                *m += x;
            }
        }
        for m in mean.iter_mut() {
            *m /= n as f64;
        }
        mean
    }

    /// Translate so that the mean of every dimension is zero
    pub fn center(&mut self) {
        if self.is_empty() {
            return;
        }
        let mean = self.mean();
        for p in self.coords.chunks_exact_mut(self.dimensions) {
            for (x, m) in p.iter_mut().zip(&mean) {
                *x -= m;
            }
        }
    }

    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|x| x.is_finite())
    }
}
