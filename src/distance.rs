//! All-pairs hop distances via breadth-first search

use crate::graph::Graph;
use std::collections::VecDeque;

/// Shortest-path hop counts from every node to every node it can reach.
///
/// Row `i` lists `(j, d(i, j))` sorted by `j`, including `(i, 0)`.
/// Nodes outside `i`'s connected component never appear in row `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMap {
    rows: Vec<Vec<(usize, u32)>>,
}

impl DistanceMap {
    pub fn from_graph(graph: &Graph) -> Self {
        Self::from_adjacency(&graph.adjacency())
    }

    /// One BFS per source node: O(n·(n+m))
    pub fn from_adjacency(adjacency: &[Vec<usize>]) -> Self {
        let rows = (0..adjacency.len())
            .map(|source| bfs_distances(adjacency, source))
            .collect();
        Self { rows }
    }

    pub fn node_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, node: usize) -> &[(usize, u32)] {
        self.rows.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Hop distance between `i` and `j`, or `None` if unreachable
    pub fn get(&self, i: usize, j: usize) -> Option<u32> {
        let row = self.rows.get(i)?;
        row.binary_search_by_key(&j, |&(node, _)| node)
            .ok()
            .map(|idx| row[idx].1)
    }

    /// Reachable unordered pairs `(i, j, d)` with `i < j`
    pub fn upper_pairs(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .filter(move |&&(j, _)| i < j)
                .map(move |&(j, d)| (i, j, d))
        })
    }
}

/// BFS hop counts from `source`, sorted by node id
pub fn bfs_distances(adjacency: &[Vec<usize>], source: usize) -> Vec<(usize, u32)> {
    let n = adjacency.len();
    let mut dist: Vec<Option<u32>> = vec![None; n];
    let mut queue = VecDeque::new();

    dist[source] = Some(0);
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = dist[v].unwrap_or(0) + 1;
        for &u in &adjacency[v] {
            if dist[u].is_some() {
                continue;
            }
            dist[u] = Some(next);
            queue.push_back(u);
        }
    }

    dist.into_iter()
        .enumerate()
        .filter_map(|(node, d)| d.map(|d| (node, d)))
        .collect()
}
