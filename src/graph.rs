//! Undirected graph and adjacency construction
//!
//! Nodes are dense zero-based indices. Graphs whose nodes carry arbitrary
//! labels are relabeled through [`LabeledGraph`], which keeps the label table
//! so that positions can be mapped back to the original identifiers.

use crate::error::{LayoutError, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Undirected, unweighted graph over nodes `0..node_count`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    node_count: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Build a graph from an edge list.
    ///
    /// Self-loops are dropped. Duplicate edges are kept as given; they do not
    /// change any shortest-path distance.
    pub fn new(node_count: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let mut kept = Vec::new();
        for (u, v) in edges {
            for node in [u, v] {
                if node >= node_count {
                    return Err(LayoutError::NodeOutOfRange { node, node_count });
                }
            }
            if u != v {
                kept.push((u, v));
            }
        }

        Ok(Self {
            node_count,
            edges: kept,
        })
    }

    /// Edges already known to be in range and loop-free
    pub(crate) fn from_valid_edges(node_count: usize, edges: Vec<(usize, usize)>) -> Self {
        debug_assert!(edges.iter().all(|&(u, v)| u < node_count && v < node_count && u != v));
        Self { node_count, edges }
    }

    /// Graph with `node_count` nodes and no edges
    pub fn empty(node_count: usize) -> Self {
        Self {
            node_count,
            edges: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Neighbor lists for every node. Each edge `(u, v)` contributes `v` to
    /// `u`'s list and `u` to `v`'s list; isolated nodes get an empty list.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.node_count];
        for &(u, v) in &self.edges {
            adj[u].push(v);
            adj[v].push(u);
        }
        adj
    }

    /// Number of incident edge endpoints per node
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.node_count];
        for &(u, v) in &self.edges {
            degrees[u] += 1;
            degrees[v] += 1;
        }
        degrees
    }
}

/// A [`Graph`] relabeled from arbitrary node identifiers.
///
/// `labels[k]` is the original identifier of dense node `k`. Labels are
/// assigned in order of first appearance, node list first, then edges.
#[derive(Debug, Clone)]
pub struct LabeledGraph<L> {
    pub graph: Graph,
    pub labels: Vec<L>,
}

impl<L: Clone + Eq + Hash> LabeledGraph<L> {
    pub fn from_edges(edges: impl IntoIterator<Item = (L, L)>) -> Self {
        Self::with_nodes(std::iter::empty(), edges)
    }

    /// Relabel a graph whose node list may hold nodes without edges
    pub fn with_nodes(
        nodes: impl IntoIterator<Item = L>,
        edges: impl IntoIterator<Item = (L, L)>,
    ) -> Self {
        let mut index: HashMap<L, usize> = HashMap::new();
        let mut labels = Vec::new();
        let mut dense = Vec::new();

        let mut intern = |label: L, labels: &mut Vec<L>| -> usize {
            *index.entry(label.clone()).or_insert_with(|| {
                labels.push(label);
                labels.len() - 1
            })
        };

        for node in nodes {
            intern(node, &mut labels);
        }
        for (u, v) in edges {
            let du = intern(u, &mut labels);
            let dv = intern(v, &mut labels);
            if du != dv {
                dense.push((du, dv));
            }
        }

        Self {
            graph: Graph {
                node_count: labels.len(),
                edges: dense,
            },
            labels,
        }
    }

    /// Original label of a dense node id
    pub fn label(&self, node: usize) -> Option<&L> {
        self.labels.get(node)
    }
}
