//! SGD-Layout: Graph Drawing by Stochastic Gradient Descent
//!
//! Core library for stress-minimizing node-link layouts. Euclidean distances
//! between node positions are fitted to shortest-path hop counts by
//! stochastic pairwise updates under an annealed learning rate.
//!
//! Pipeline: graph → adjacency → distances → pairs + weight bounds →
//! schedule → optimizer → stress.

pub mod config;
pub mod coordinates;
pub mod distance;
pub mod error;
pub mod generators;
pub mod graph;
pub mod layout;
pub mod pairs;
pub mod result_file;
pub mod schedule;
pub mod stress;

pub use config::LayoutConfig;
pub use coordinates::Positions;
pub use error::{LayoutError, Result};
pub use graph::{Graph, LabeledGraph};
pub use layout::{LayoutResult, SgdLayout};
pub use stress::{compute_stress, StressMetric};

/// Lay out `graph` with the given configuration.
///
/// Returns the initial random layout and the optimized one. Fails with
/// [`LayoutError::DegenerateGraph`] if the graph has no edges.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> Result<LayoutResult> {
    SgdLayout::with_config(config.clone()).compute(graph)
}
