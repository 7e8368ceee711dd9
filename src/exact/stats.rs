use serde::Serialize;
use std::time::Duration;

/// Counters collected by [`super::BranchAndBound`] for diagnostics. None of them influences the
/// search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolverStatistics {
    /// Total (pivot, partner) expansions, i.e. child frames created
    pub nodes_expanded: u64,
    /// Frames discarded because their bound could not beat the incumbent
    pub prunings: u64,
    /// Complete pairings reached, whether or not they improved the incumbent
    pub complete_pairings: u64,
    /// Number of times the incumbent was replaced
    pub improvements: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Deepest frame stack observed; at most `n/2 + 1`
    pub max_depth: u64,
    pub elapsed: Duration,
}

impl SolverStatistics {
    #[inline]
    pub fn on_node_expanded(&mut self, depth: usize) {
        self.nodes_expanded += 1;
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn on_pruned(&mut self) {
        self.prunings += 1;
    }

    #[inline]
    pub fn on_complete_pairing(&mut self, improved: bool) {
        self.complete_pairings += 1;
        self.improvements += improved as u64;
    }
}
