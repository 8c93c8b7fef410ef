//! Stress Minimization by Stochastic Gradient Descent
//!
//! Each iteration visits every connected pair in a fresh random order and
//! moves both endpoints along their difference vector so that their
//! separation approaches the graph distance `d_ij`:
//!
//! ```text
//! r  = ((|Δ| - d_ij) / 2) · Δ / |Δ|      Δ = x_j - x_i
//! μ  = min(w_ij · η, 1)
//! x_i += μ·r,  x_j -= μ·r
//! ```
//!
//! The opposite-sign update leaves the pair's midpoint unchanged. The step
//! size `η` follows the annealed [`LearningRateSchedule`].

use crate::config::LayoutConfig;
use crate::coordinates::{norm, Positions};
use crate::distance::DistanceMap;
use crate::error::{LayoutError, Result};
use crate::graph::Graph;
use crate::pairs::{PairRecord, PairSet};
use crate::schedule::LearningRateSchedule;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Separation below which a pair is treated as coincident
pub const COINCIDENT_THRESHOLD: f64 = 1e-12;

/// Standard deviation of the random direction used for coincident pairs
pub const PERTURBATION_STD: f64 = 1e-6;

/// Initial and optimized layouts of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Layout exactly as placed, before any update
    pub initial: Positions,
    pub final_positions: Positions,
}

/// Where a run stands in its schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The next iteration to execute
    Optimizing { iteration: usize },
    /// Schedule exhausted
    Converged,
}

/// Move one pair toward its target distance.
///
/// `diff` is scratch space of length `positions.dimensions()`. Returns `true`
/// if the pair was coincident and a random direction had to be drawn.
pub fn apply_pair_update<R: Rng + ?Sized>(
    positions: &mut Positions,
    pair: &PairRecord,
    eta: f64,
    rng: &mut R,
    diff: &mut [f64],
) -> bool {
    let (xi, xj) = (positions.point(pair.i), positions.point(pair.j));
    for ((d, a), b) in diff.iter_mut().zip(xi).zip(xj) {
        *d = b - a;
    }

    let mut dist = norm(diff);
    let coincident = dist < COINCIDENT_THRESHOLD;
    while dist < COINCIDENT_THRESHOLD {
        for d in diff.iter_mut() {
            *d = rng.sample::<f64, _>(StandardNormal) * PERTURBATION_STD;
        }
        dist = norm(diff);
    }

    let half_error = (dist - pair.dij) / 2.0;
    let mu = (pair.wij * eta).min(1.0);
    for d in diff.iter_mut() {
        *d = mu * half_error * (*d / dist);
    }

    for (x, step) in positions.point_mut(pair.i).iter_mut().zip(diff.iter()) {
        *x += step;
    }
    for (x, step) in positions.point_mut(pair.j).iter_mut().zip(diff.iter()) {
        *x -= step;
    }

    coincident
}

/// A single optimization run, stepped one schedule entry at a time
pub struct SgdRun {
    pairs: Vec<PairRecord>,
    schedule: LearningRateSchedule,
    initial: Positions,
    positions: Positions,
    rng: StdRng,
    shuffle_rng: StdRng,
    next_iteration: usize,
    center: bool,
    scratch: Vec<f64>,
    perturbations: usize,
}

impl SgdRun {
    /// Start from a caller-supplied layout. `rng` drives coincident-pair
    /// perturbations, `shuffle_rng` the pair permutations.
    pub fn new(
        pair_set: PairSet,
        schedule: LearningRateSchedule,
        initial: Positions,
        rng: StdRng,
        shuffle_rng: StdRng,
        center: bool,
    ) -> Result<Self> {
        if let Some(node) = pair_set
            .pairs
            .iter()
            .map(|p| p.j)
            .max()
            .filter(|&max| max >= initial.len())
        {
            return Err(LayoutError::MissingPosition { node });
        }

        let dimensions = initial.dimensions();
        if dimensions == 0 {
            return Err(LayoutError::InvalidDimensions(dimensions));
        }

        Ok(Self {
            pairs: pair_set.pairs,
            schedule,
            positions: initial.clone(),
            initial,
            rng,
            shuffle_rng,
            next_iteration: 0,
            center,
            scratch: vec![0.0; dimensions],
            perturbations: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        if self.next_iteration < self.schedule.len() {
            Phase::Optimizing {
                iteration: self.next_iteration,
            }
        } else {
            Phase::Converged
        }
    }

    /// Current working layout
    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn initial(&self) -> &Positions {
        &self.initial
    }

    /// Coincident pairs perturbed so far
    pub fn perturbations(&self) -> usize {
        self.perturbations
    }

    /// Run the next iteration. Returns the learning rate used, or `None`
    /// once the schedule is exhausted.
    pub fn step(&mut self) -> Option<f64> {
        let iteration = self.next_iteration;
        let eta = *self.schedule.etas().get(iteration)?;

        self.pairs.shuffle(&mut self.shuffle_rng);

        let mut perturbed = 0;
        for pair in &self.pairs {
            if apply_pair_update(
                &mut self.positions,
                pair,
                eta,
                &mut self.rng,
                &mut self.scratch,
            ) {
                perturbed += 1;
            }
        }
        self.perturbations += perturbed;
        self.next_iteration += 1;

        debug!(iteration = iteration + 1, eta, perturbed, "sgd iteration");
        Some(eta)
    }

    /// Exhaust the schedule and hand back both layouts
    pub fn finish(mut self) -> LayoutResult {
        while self.step().is_some() {}

        if self.center {
            self.positions.center();
        }

        LayoutResult {
            initial: self.initial,
            final_positions: self.positions,
        }
    }
}

/// SGD stress-minimizing layout engine
#[derive(Debug, Clone)]
pub struct SgdLayout {
    config: LayoutConfig,
}

impl SgdLayout {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Prepare a run from a random initial layout: uniform in `[0, 1)` per
    /// dimension, recentered if configured.
    pub fn start(&self, graph: &Graph) -> Result<SgdRun> {
        self.config.validate()?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let mut initial =
            Positions::random_uniform(graph.node_count(), self.config.dimensions, &mut rng);
        if self.config.center {
            initial.center();
        }

        self.start_with_rng(graph, initial, rng)
    }

    /// Prepare a run from a given initial layout. The layout is used as is;
    /// only the final layout is recentered.
    pub fn start_from(&self, graph: &Graph, initial: Positions) -> Result<SgdRun> {
        self.config.validate()?;
        if initial.dimensions() != self.config.dimensions {
            return Err(LayoutError::DimensionMismatch {
                expected: self.config.dimensions,
                found: initial.dimensions(),
            });
        }
        if initial.len() < graph.node_count() {
            return Err(LayoutError::MissingPosition {
                node: initial.len(),
            });
        }
        let rng = StdRng::seed_from_u64(self.config.seed);
        self.start_with_rng(graph, initial, rng)
    }

    fn start_with_rng(&self, graph: &Graph, initial: Positions, rng: StdRng) -> Result<SgdRun> {
        let dist = DistanceMap::from_graph(graph);
        let pair_set = PairSet::extract(&dist)?;
        let schedule = LearningRateSchedule::new(
            self.config.iterations,
            pair_set.w_min,
            pair_set.w_max,
            self.config.epsilon,
        )?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            pairs = pair_set.len(),
            iterations = schedule.len(),
            eta_max = schedule.first(),
            eta_min = schedule.last(),
            "starting sgd layout"
        );
        debug!(etas = ?schedule.iter().collect::<Vec<_>>(), "learning-rate schedule");

        let shuffle_rng = StdRng::seed_from_u64(self.config.effective_shuffle_seed());
        SgdRun::new(
            pair_set,
            schedule,
            initial,
            rng,
            shuffle_rng,
            self.config.center,
        )
    }

    pub fn compute(&self, graph: &Graph) -> Result<LayoutResult> {
        let run = self.start(graph)?;
        Ok(Self::complete(run))
    }

    pub fn compute_from(&self, graph: &Graph, initial: Positions) -> Result<LayoutResult> {
        let run = self.start_from(graph, initial)?;
        Ok(Self::complete(run))
    }

    fn complete(run: SgdRun) -> LayoutResult {
        let result = run.finish();
        info!(
            nodes = result.final_positions.len(),
            "sgd layout converged"
        );
        result
    }
}

impl Default for SgdLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: usize) -> Graph {
        Graph::new(n, (1..n).map(|i| (i - 1, i))).unwrap()
    }

    #[test]
    fn test_pair_update_conserves_midpoint() {
        let mut pos = Positions::from_points(vec![vec![0.3, -1.2], vec![2.5, 0.7]]).unwrap();
        let pair = PairRecord::new(0, 1, 1.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut scratch = vec![0.0; 2];

        let before: Vec<f64> = (0..2)
            .map(|k| (pos.point(0)[k] + pos.point(1)[k]) / 2.0)
            .collect();
        apply_pair_update(&mut pos, &pair, 0.5, &mut rng, &mut scratch);
        let after: Vec<f64> = (0..2)
            .map(|k| (pos.point(0)[k] + pos.point(1)[k]) / 2.0)
            .collect();

        for k in 0..2 {
            assert!((before[k] - after[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_full_step_reaches_target_distance() {
        let mut pos = Positions::from_points(vec![vec![0.0, 0.0], vec![4.0, 0.0]]).unwrap();
        let pair = PairRecord::new(0, 1, 2.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut scratch = vec![0.0; 2];

        // w = 1/4, eta = 4 gives mu = 1
        apply_pair_update(&mut pos, &pair, 4.0, &mut rng, &mut scratch);

        assert!((pos.distance(0, 1) - 2.0).abs() < 1e-12);
        assert_eq!(pos.point(0), &[1.0, 0.0]);
        assert_eq!(pos.point(1), &[3.0, 0.0]);
    }

    #[test]
    fn test_coincident_pair_is_perturbed() {
        let mut pos = Positions::from_points(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let pair = PairRecord::new(0, 1, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut scratch = vec![0.0; 2];

        let perturbed = apply_pair_update(&mut pos, &pair, 1.0, &mut rng, &mut scratch);

        assert!(perturbed);
        assert!(pos.is_finite());
        assert!((pos.distance(0, 1) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_phases() {
        let mut config = LayoutConfig::default();
        config.iterations = 3;
        let mut run = SgdLayout::with_config(config).start(&path_graph(4)).unwrap();

        assert_eq!(run.phase(), Phase::Optimizing { iteration: 0 });
        let first = run.step().unwrap();
        let second = run.step().unwrap();
        assert!(second < first);
        assert_eq!(run.phase(), Phase::Optimizing { iteration: 2 });
        run.step().unwrap();
        assert_eq!(run.phase(), Phase::Converged);
        assert!(run.step().is_none());
    }

    /// Replay a run by hand, reshuffling either every pass or only the first
    fn replay(config: &LayoutConfig, graph: &Graph, initial: &Positions, every_pass: bool) -> Positions {
        let pair_set = PairSet::extract(&DistanceMap::from_graph(graph)).unwrap();
        let schedule = LearningRateSchedule::new(
            config.iterations,
            pair_set.w_min,
            pair_set.w_max,
            config.epsilon,
        )
        .unwrap();

        let mut pairs = pair_set.pairs;
        let mut positions = initial.clone();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut shuffle_rng = StdRng::seed_from_u64(config.effective_shuffle_seed());
        let mut scratch = vec![0.0; config.dimensions];

        for (t, eta) in schedule.iter().enumerate() {
            if every_pass || t == 0 {
                pairs.shuffle(&mut shuffle_rng);
            }
            for pair in &pairs {
                apply_pair_update(&mut positions, pair, eta, &mut rng, &mut scratch);
            }
        }
        positions
    }

    #[test]
    fn test_pairs_reshuffled_every_iteration() {
        let graph = Graph::new(7, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 0), (0, 3)])
            .unwrap();
        let mut config = LayoutConfig::default();
        config.iterations = 4;
        config.center = false;
        let initial = Positions::random_uniform(7, 2, &mut StdRng::seed_from_u64(11));

        let result = SgdLayout::with_config(config.clone())
            .compute_from(&graph, initial.clone())
            .unwrap();

        assert_eq!(result.final_positions, replay(&config, &graph, &initial, true));
        assert_ne!(result.final_positions, replay(&config, &graph, &initial, false));
    }

    #[test]
    fn test_initial_layout_is_preserved() {
        let layout = SgdLayout::new();
        let run = layout.start(&path_graph(5)).unwrap();
        let snapshot = run.initial().clone();

        let result = run.finish();
        assert_eq!(result.initial, snapshot);
        assert_ne!(result.initial, result.final_positions);
    }

    #[test]
    fn test_centering_both_layouts() {
        let result = SgdLayout::new().compute(&path_graph(6)).unwrap();
        for m in result.initial.mean().into_iter().chain(result.final_positions.mean()) {
            assert!(m.abs() < 1e-9);
        }
    }

    #[test]
    fn test_uncentered_initial_in_unit_square() {
        let mut config = LayoutConfig::default();
        config.center = false;
        let result = SgdLayout::with_config(config).compute(&path_graph(6)).unwrap();
        assert!(result
            .initial
            .as_slice()
            .iter()
            .all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_start_from_rejects_wrong_dimensions() {
        let graph = path_graph(3);
        let initial = Positions::zeros(3, 3);
        assert!(matches!(
            SgdLayout::new().start_from(&graph, initial),
            Err(LayoutError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_start_from_rejects_short_layout() {
        let graph = path_graph(3);
        let initial = Positions::zeros(2, 2);
        assert!(matches!(
            SgdLayout::new().start_from(&graph, initial),
            Err(LayoutError::MissingPosition { node: 2 })
        ));
    }

    #[test]
    fn test_edgeless_graph_fails() {
        assert!(matches!(
            SgdLayout::new().compute(&Graph::empty(4)),
            Err(LayoutError::DegenerateGraph)
        ));
    }

    #[test]
    fn test_three_dimensional_layout() {
        let mut config = LayoutConfig::default();
        config.dimensions = 3;
        let result = SgdLayout::with_config(config).compute(&path_graph(5)).unwrap();
        assert_eq!(result.final_positions.dimensions(), 3);
        assert_eq!(result.final_positions.len(), 5);
    }
}
