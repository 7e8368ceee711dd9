pub mod bound;
pub mod branch_and_bound;
pub mod naive;
pub mod stats;

pub use bound::*;
pub use branch_and_bound::{BranchAndBound, solve, solve_with_bound};
pub use naive::naive_solver;
pub use stats::*;

use crate::{
    errors::{InputError, Result},
    graph::*,
    utils::Pairing,
};
use serde::Serialize;

/// Result of an exact solver run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairingSolution {
    /// Sum of the scores of all pairs in `pairing`
    pub score: Score,

    /// Perfect matching in the order in which the search chose the pairs
    pub pairing: Pairing,

    /// Number of (pivot, partner) expansions carried out by the search
    pub nodes_expanded: u64,

    /// False if the search was stopped early; `pairing` is then only the best one found so far
    pub optimal: bool,
}

/// Rejects instances no perfect matching exists for
pub(crate) fn check_solvable<W: WeightLookup>(weights: &W) -> Result<()> {
    let n = weights.number_of_nodes();
    if n % 2 == 1 {
        return Err(InputError::odd_number_of_nodes(n));
    }
    Ok(())
}

/// Compares scores of two pairings of the same instance. Summing the same pairs in a different
/// order may differ in the last bits, hence the relative tolerance.
pub fn scores_agree(a: Score, b: Score) -> bool {
    a == b || (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
