//! Synthetic graph generators for drivers, tests and benchmarks

use crate::graph::Graph;
use rand::prelude::*;

/// Erdős–Rényi G(n, p): every unordered pair is joined independently with
/// probability `p`. Isolated nodes are kept.
pub fn gnp_random_graph(n: usize, p: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen::<f64>() < p {
                edges.push((i, j));
            }
        }
    }

    Graph::from_valid_edges(n, edges)
}

/// 0 - 1 - ... - (n-1)
pub fn path_graph(n: usize) -> Graph {
    Graph::from_valid_edges(n, (1..n).map(|i| (i - 1, i)).collect())
}

/// Path closed back to node 0; fewer than 3 nodes gives a path
pub fn cycle_graph(n: usize) -> Graph {
    let mut edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
    if n >= 3 {
        edges.push((n - 1, 0));
    }
    Graph::from_valid_edges(n, edges)
}

/// `rows × cols` lattice, node `r * cols + c`
pub fn grid_graph(rows: usize, cols: usize) -> Graph {
    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let node = r * cols + c;
            if c + 1 < cols {
                edges.push((node, node + 1));
            }
            if r + 1 < rows {
                edges.push((node, node + cols));
            }
        }
    }
    Graph::from_valid_edges(rows * cols, edges)
}
