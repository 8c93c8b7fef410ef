//! Property-based tests for sgd_layout
//!
//! Invariants of the distance oracle, pair extraction, schedule, pairwise
//! update and stress evaluator over randomly generated graphs and layouts.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sgd_layout::coordinates::Positions;
use sgd_layout::distance::DistanceMap;
use sgd_layout::layout::apply_pair_update;
use sgd_layout::pairs::{PairRecord, PairSet};
use sgd_layout::schedule::LearningRateSchedule;
use sgd_layout::{compute_stress, Graph};

// ============================================================================
// Strategies
// ============================================================================

/// Connected graphs on 2..=20 nodes: a binary-heap spanning tree plus random
/// extra edges.
fn connected_graph_strategy() -> impl Strategy<Value = Graph> {
    (2usize..=20).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 0..2 * n).prop_map(move |extra| {
            let mut edges: Vec<(usize, usize)> = (1..n).map(|i| (i, (i - 1) / 2)).collect();
            edges.extend(extra);
            Graph::new(n, edges).expect("endpoints are in range")
        })
    })
}

/// Graphs that may be disconnected, including isolated nodes
fn any_graph_strategy() -> impl Strategy<Value = Graph> {
    (1usize..=16).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 0..2 * n)
            .prop_map(move |edges| Graph::new(n, edges).expect("endpoints are in range"))
    })
}

fn point_strategy(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-100.0..100.0_f64, dim)
}

// ============================================================================
// Distance Oracle
// ============================================================================

proptest! {
    /// d(i, j) == d(j, i) and d(i, i) == 0
    #[test]
    fn prop_distance_symmetry(graph in any_graph_strategy()) {
        let dist = DistanceMap::from_graph(&graph);
        for i in 0..graph.node_count() {
            prop_assert_eq!(dist.get(i, i), Some(0));
            for &(j, d) in dist.row(i) {
                prop_assert_eq!(dist.get(j, i), Some(d));
            }
        }
    }

    /// Adjacent nodes differ by at most one hop from any source
    #[test]
    fn prop_edges_are_bfs_consistent(graph in connected_graph_strategy()) {
        let dist = DistanceMap::from_graph(&graph);
        for &(u, v) in graph.edges() {
            prop_assert_eq!(dist.get(u, v), Some(1));
            for s in 0..graph.node_count() {
                let du = dist.get(s, u).unwrap() as i64;
                let dv = dist.get(s, v).unwrap() as i64;
                prop_assert!((du - dv).abs() <= 1);
            }
        }
    }
}

// ============================================================================
// Pair Extractor
// ============================================================================

proptest! {
    /// A connected graph yields exactly one record per unordered pair
    #[test]
    fn prop_connected_graph_pair_count(graph in connected_graph_strategy()) {
        let n = graph.node_count();
        let set = PairSet::extract(&DistanceMap::from_graph(&graph)).unwrap();
        prop_assert_eq!(set.len(), n * (n - 1) / 2);
        prop_assert_eq!(set.nodes.len(), n);
    }

    /// w_ij = 1/d_ij² and the bounds enclose every weight
    #[test]
    fn prop_weights_and_bounds(graph in connected_graph_strategy()) {
        let set = PairSet::extract(&DistanceMap::from_graph(&graph)).unwrap();
        for p in &set.pairs {
            prop_assert!(p.i < p.j);
            prop_assert!(p.dij >= 1.0);
            prop_assert!((p.wij * p.dij * p.dij - 1.0).abs() < 1e-12);
            prop_assert!(p.wij >= set.w_min && p.wij <= set.w_max);
        }
    }
}

// ============================================================================
// Schedule Generator
// ============================================================================

proptest! {
    /// w_min·η_0 == 1 and w_max·η_{T-1} == ε, strictly decreasing between
    #[test]
    fn prop_schedule_boundaries(
        iterations in 2usize..200,
        d_min in 1u32..5,
        d_span in 0u32..40,
        epsilon in 0.001..0.999_f64,
    ) {
        let d_max = (d_min + d_span) as f64;
        let d_min = d_min as f64;
        let (w_min, w_max) = (1.0 / (d_max * d_max), 1.0 / (d_min * d_min));

        let schedule = LearningRateSchedule::new(iterations, w_min, w_max, epsilon).unwrap();
        prop_assert_eq!(schedule.len(), iterations);
        prop_assert!((w_min * schedule.first() - 1.0).abs() < 1e-9);
        prop_assert!((w_max * schedule.last() - epsilon).abs() < 1e-9);
        for w in schedule.etas().windows(2) {
            prop_assert!(w[1] < w[0]);
        }
    }
}

// ============================================================================
// Pairwise Update
// ============================================================================

proptest! {
    /// A single update never moves the pair's midpoint
    #[test]
    fn prop_update_conserves_midpoint(
        a in point_strategy(2),
        b in point_strategy(2),
        d in 1u32..20,
        eta in 0.001..500.0_f64,
        seed in any::<u64>(),
    ) {
        let mut pos = Positions::from_points(vec![a.clone(), b.clone()]).unwrap();
        let pair = PairRecord::new(0, 1, d as f64);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut scratch = vec![0.0; 2];

        apply_pair_update(&mut pos, &pair, eta, &mut rng, &mut scratch);

        for k in 0..2 {
            let before = (a[k] + b[k]) / 2.0;
            let after = (pos.point(0)[k] + pos.point(1)[k]) / 2.0;
            prop_assert!((before - after).abs() < 1e-9, "dim {}: {} vs {}", k, before, after);
        }
    }

    /// The separation error never grows, and with μ = 1 it vanishes
    #[test]
    fn prop_update_reduces_pair_error(
        a in point_strategy(3),
        b in point_strategy(3),
        d in 1u32..20,
        eta in 0.001..500.0_f64,
    ) {
        let mut pos = Positions::from_points(vec![a, b]).unwrap();
        let pair = PairRecord::new(0, 1, d as f64);
        let mut rng = StdRng::seed_from_u64(0);
        let mut scratch = vec![0.0; 3];

        let before = (pos.distance(0, 1) - pair.dij).abs();
        apply_pair_update(&mut pos, &pair, eta, &mut rng, &mut scratch);
        let after = (pos.distance(0, 1) - pair.dij).abs();

        prop_assert!(after <= before + 1e-9);
        if pair.wij * eta >= 1.0 {
            prop_assert!(after < 1e-6);
        }
    }
}

// ============================================================================
// Stress Evaluator
// ============================================================================

proptest! {
    #[test]
    fn prop_stress_is_non_negative(
        graph in any_graph_strategy(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pos = Positions::random_uniform(graph.node_count(), 2, &mut rng);
        let stress = compute_stress(&graph, &pos).unwrap();
        prop_assert!(stress >= 0.0);
        prop_assert!(stress.is_finite());
    }
}
