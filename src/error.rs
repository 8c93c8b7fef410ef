//! Error types for layout computation and result-file I/O.

use thiserror::Error;

/// Errors surfaced by the layout pipeline
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("graph has no connected node pairs; weight bounds are undefined")]
    DegenerateGraph,

    #[error("no position supplied for node {node}")]
    MissingPosition { node: usize },

    #[error("iteration count must be at least 2, got {0}")]
    InvalidIterations(usize),

    #[error("epsilon must lie in (0, 1), got {0}")]
    InvalidEpsilon(f64),

    #[error("dimension count must be at least 1, got {0}")]
    InvalidDimensions(usize),

    #[error("invalid weight bounds: w_min = {w_min}, w_max = {w_max}")]
    InvalidWeightBounds { w_min: f64, w_max: f64 },

    #[error("coordinate buffer of length {len} does not split into {dimensions}-dimensional points")]
    MalformedPositions { dimensions: usize, len: usize },

    #[error("edge endpoint {node} is out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
