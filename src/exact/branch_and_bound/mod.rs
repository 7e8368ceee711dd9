#![allow(rustdoc::private_intra_doc_links)]

use super::*;
use crate::{
    algorithm::{IterativeAlgorithm, TerminatingIterativeAlgorithm},
    errors::InvariantCheck,
};
use itertools::Itertools;
use log::{debug, info};
use std::time::{Duration, Instant};

mod frame;
use frame::*;

mod incumbent;
use incumbent::Incumbent;

/// Frames processed per call of [`BranchAndBound::execute_step`]
const ITERATIONS_PER_STEP: usize = 1 << 14;

/// Exact depth-first branch-and-bound search for a maximum-weight perfect pairing.
///
/// Each frame on the stack corresponds to one recursion level: it holds the set of unmatched
/// nodes and the score of the path leading to it. A frame pairs the smallest unmatched node (the
/// pivot) with each other unmatched node, heaviest partner first, and discards itself if the
/// memoized [`upper_bound`] of its state cannot beat the incumbent. Since exactly two nodes are
/// matched per level, the stack never exceeds `n/2 + 1` frames.
///
/// The search is driven through [`IterativeAlgorithm`], so it may be interrupted (by a time limit,
/// [`BranchAndBound::set_node_limit`] or a termination signal) and still report the best pairing
/// found so far, flagged as not optimal.
///
/// # Example
/// ```
/// use pairing::{algorithm::*, exact::BranchAndBound, graph::*};
///
/// let matrix = WeightMatrix::try_from_edges(
///     4,
///     [(0, 1, 5.0), (2, 3, 5.0), (0, 2, 1.0)],
///     1.0,
///     DuplicatePolicy::Overwrite,
/// )
/// .unwrap();
///
/// let mut algo = BranchAndBound::new(&matrix).unwrap();
/// let solution = algo.run_to_completion().unwrap();
/// assert_eq!(solution.score, 10.0);
/// assert!(solution.optimal);
/// ```
pub struct BranchAndBound<'a, W: WeightLookup> {
    stack: Vec<Frame>,
    ctx: SearchContext<'a, W>,

    iterations: usize,
    start: Option<Instant>,
    /// Frozen once the stack runs empty
    elapsed: Option<Duration>,
    aborted: bool,
    drop_output: bool,
}

/// State shared by all frames of one search
struct SearchContext<'a, W> {
    weights: &'a W,
    cache: BoundCache,
    incumbent: Incumbent,

    /// Pairs chosen along the current path; frames push before branching and pop on resumption
    current: Pairing,
    stats: SolverStatistics,

    node_limit: Option<u64>,
    paranoid: bool,
}

enum BBResult {
    Completed,
    Branch(Frame),
    Abort,
}

impl<W: WeightLookup> SearchContext<'_, W> {
    fn budget_exhausted(&self) -> bool {
        self.node_limit
            .is_some_and(|limit| self.stats.nodes_expanded >= limit)
    }

    fn on_improvement(&mut self) {
        debug!(
            "New incumbent {} after {} expansions",
            self.incumbent.score(),
            self.stats.nodes_expanded
        );

        if self.paranoid {
            let pairing = self.incumbent.pairing();
            assert!(pairing.is_correct().is_ok(), "{:?}", pairing.is_correct());
            let recomputed = pairing.total_score(self.weights);
            assert!(
                scores_agree(recomputed, self.incumbent.score()),
                "score {} differs from recomputed {recomputed}",
                self.incumbent.score()
            );
        }
    }
}

impl<'a, W: WeightLookup> BranchAndBound<'a, W> {
    /// Prepares a search over all nodes of `weights`. Fails with
    /// [`InputError::InvalidInput`] if the number of nodes is odd, as no perfect pairing exists.
    pub fn new(weights: &'a W) -> Result<Self> {
        check_solvable(weights)?;

        let n = weights.number_of_nodes();
        let mut stack = Vec::with_capacity(n as usize / 2 + 1);
        stack.push(Frame::new(NodeMask::full(n), 0.0));

        Ok(Self {
            stack,
            ctx: SearchContext {
                weights,
                cache: BoundCache::new(BoundKind::default()),
                incumbent: Incumbent::new(n),
                current: Pairing::new(n),
                stats: SolverStatistics::default(),
                node_limit: None,
                paranoid: false,
            },
            iterations: 0,
            start: None,
            elapsed: None,
            aborted: false,
            drop_output: false,
        })
    }

    /// Selects the relaxation used for pruning (see [`BoundKind`]).
    ///
    /// # Warning
    /// This method may only be called before the first execution of the algorithm.
    pub fn set_bound_kind(&mut self, kind: BoundKind) {
        assert_eq!(self.iterations, 0);
        self.ctx.cache = BoundCache::new(kind);
    }

    /// Stops the search once `limit` expansions were carried out. The result is then the best
    /// pairing found so far (if any) and is not flagged as optimal.
    ///
    /// # Warning
    /// This method may only be called before the first execution of the algorithm.
    pub fn set_node_limit(&mut self, limit: Option<u64>) {
        assert_eq!(self.iterations, 0);
        self.ctx.node_limit = limit;
    }

    /// Validates each new incumbent (perfect pairing, score matches the weights).
    pub fn set_paranoia(&mut self, enabled: bool) {
        self.ctx.paranoid = enabled;
    }

    /// Logs the remaining frames if the solver instance is dropped without completing.
    /// This is useful if an assertion fired during the computation. However, be aware,
    /// that if you're using the solver with a time limit, this functionality might also
    /// fire if the solver did not finish within the time budget.
    pub fn set_drop_output(&mut self, enabled: bool) {
        self.drop_output = enabled;
    }

    /// Returns the number of frames processed so far
    pub fn number_of_iterations(&self) -> usize {
        self.iterations
    }

    pub fn statistics(&self) -> SolverStatistics {
        let mut stats = self.ctx.stats.clone();
        stats.cache_hits = self.ctx.cache.number_of_cache_hits();
        stats.cache_misses = self.ctx.cache.number_of_cache_misses();
        stats.elapsed = self
            .elapsed
            .or_else(|| self.start.map(|s| s.elapsed()))
            .unwrap_or(Duration::ZERO);
        stats
    }

    /// True if the search space was exhausted, i.e. the incumbent is optimal
    pub fn is_optimal(&self) -> bool {
        self.stack.is_empty() && !self.aborted
    }

    /// Runs the search to completion (or until interrupted) and returns the best pairing.
    /// Apart from an interruption before the first complete pairing, this always yields a result.
    pub fn solve(&mut self) -> Option<PairingSolution> {
        self.run_to_completion()
    }

    fn process_frame(&mut self) {
        let result = {
            let top = self.stack.last_mut().unwrap();
            if top.is_initialized() {
                top.resume(&mut self.ctx)
            } else {
                top.initialize(&mut self.ctx)
            }
        };

        match result {
            BBResult::Completed => {
                self.stack.pop();
            }

            BBResult::Branch(frame) => {
                self.ctx.stats.on_node_expanded(self.stack.len() + 1);
                self.stack.push(frame);
            }

            BBResult::Abort => {
                info!(
                    "Node limit reached after {} expansions",
                    self.ctx.stats.nodes_expanded
                );
                self.aborted = true;
                self.stack.clear();
            }
        }
    }

    fn log_summary(&self) {
        let stats = self.statistics();
        info!(
            "B&B {} score: {} expansions: {} prunings: {} cache hits/misses: {}/{} time: {:?}",
            if self.is_optimal() { "optimal" } else { "stopped" },
            self.ctx.incumbent.score(),
            stats.nodes_expanded,
            stats.prunings,
            stats.cache_hits,
            stats.cache_misses,
            stats.elapsed
        );
    }
}

impl<W: WeightLookup> TerminatingIterativeAlgorithm<PairingSolution> for BranchAndBound<'_, W> {}

impl<W: WeightLookup> IterativeAlgorithm<PairingSolution> for BranchAndBound<'_, W> {
    fn execute_step(&mut self) {
        let start = *self.start.get_or_insert_with(Instant::now);

        for _ in 0..ITERATIONS_PER_STEP {
            if self.stack.is_empty() {
                break;
            }

            self.iterations += 1;
            self.process_frame();
        }

        if self.stack.is_empty() && self.elapsed.is_none() {
            self.elapsed = Some(start.elapsed());
            self.log_summary();
        }
    }

    fn is_completed(&self) -> bool {
        self.stack.is_empty()
    }

    fn best_known_solution(&mut self) -> Option<PairingSolution> {
        if !self.ctx.incumbent.is_set() {
            return None;
        }

        Some(PairingSolution {
            score: self.ctx.incumbent.score(),
            pairing: self.ctx.incumbent.pairing().clone(),
            nodes_expanded: self.ctx.stats.nodes_expanded,
            optimal: self.is_optimal(),
        })
    }
}

impl<W: WeightLookup> Drop for BranchAndBound<'_, W> {
    fn drop(&mut self) {
        if !self.drop_output || self.stack.is_empty() {
            return;
        }

        info!(
            "Dropped unfinished search; incumbent: {}",
            self.ctx.incumbent.score()
        );
        for (depth, frame) in self.stack.iter().enumerate() {
            info!(
                "{} {}",
                (0..depth).map(|_| ' ').join(""),
                frame.describe()
            );
        }
    }
}

/// Computes a maximum-weight perfect pairing with the default (clamped) bound.
///
/// Returns score `0` and an empty pairing for an instance without nodes, and
/// [`InputError::InvalidInput`] if the number of nodes is odd.
pub fn solve<W: WeightLookup>(weights: &W) -> Result<PairingSolution> {
    solve_with_bound(weights, BoundKind::default())
}

pub fn solve_with_bound<W: WeightLookup>(weights: &W, kind: BoundKind) -> Result<PairingSolution> {
    let mut algo = BranchAndBound::new(weights)?;
    algo.set_bound_kind(kind);

    // without interruption the empty state is reached at least once, so a solution exists
    while !algo.is_completed() {
        algo.execute_step();
    }

    Ok(algo
        .best_known_solution()
        .unwrap_or_else(|| unreachable!("exhaustive search always records a pairing")))
}
