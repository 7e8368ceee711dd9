//! Relaxation bound of the branch-and-bound search and its memoization.
//!
//! For a set `S` of unmatched nodes, every node independently picks its heaviest partner in `S`.
//! In any perfect matching on `S` the score of a pair is at most the pick of either endpoint, so
//! half of the sum of all picks bounds the best additional score from above.

use crate::graph::*;
use fxhash::{FxBuildHasher, FxHashMap};

const INITIAL_CAPACITY: usize = 10_000;

/// Selects how a node without a non-negative partner contributes to the bound
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundKind {
    /// Each node contributes `max(0, best partner score)`.
    #[default]
    Clamped,

    /// Each node contributes its best partner score, even if negative. Never larger than
    /// [`BoundKind::Clamped`] and still an upper bound, so it prunes at least as much.
    Unclamped,
}

/// Computes the bound for `state` from scratch
pub fn upper_bound<W: WeightLookup>(weights: &W, state: &NodeMask, kind: BoundKind) -> Score {
    let mut sum = 0.0;
    for u in state.iter_set_bits() {
        let best = weights
            .heaviest_partner_within(u, state)
            .map_or(0.0, |(_, w)| w);

        sum += match kind {
            BoundKind::Clamped => best.max(0.0),
            BoundKind::Unclamped => best,
        };
    }
    sum / 2.0
}

/// Write-once memoization of [`upper_bound`] keyed by the search state. The cache is unbounded
/// and lives exactly as long as one solver run.
pub struct BoundCache {
    cache: FxHashMap<NodeMask, Score>,
    kind: BoundKind,
    number_of_misses: u64,
    number_of_accesses: u64,
}

impl BoundCache {
    pub fn new(kind: BoundKind) -> Self {
        Self {
            cache: FxHashMap::with_capacity_and_hasher(INITIAL_CAPACITY, FxBuildHasher::default()),
            kind,
            number_of_misses: 0,
            number_of_accesses: 0,
        }
    }

    pub fn kind(&self) -> BoundKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn number_of_cache_hits(&self) -> u64 {
        self.number_of_accesses - self.number_of_misses
    }

    pub fn number_of_cache_misses(&self) -> u64 {
        self.number_of_misses
    }

    /// Returns the cached bound of `state` without computing it
    pub fn get(&self, state: &NodeMask) -> Option<Score> {
        self.cache.get(state).copied()
    }

    /// Returns the bound of `state`; computes and stores it on the first request
    pub fn get_or_compute<W: WeightLookup>(&mut self, weights: &W, state: &NodeMask) -> Score {
        self.number_of_accesses += 1;
        if let Some(&bound) = self.cache.get(state) {
            return bound;
        }

        self.number_of_misses += 1;
        let bound = upper_bound(weights, state, self.kind);
        self.cache.insert(state.clone(), bound);
        bound
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.number_of_misses = 0;
        self.number_of_accesses = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{exact::naive::naive_solver, testing::*};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    #[test]
    fn four_nodes() {
        let matrix = scenario_a();
        let all = matrix.all_nodes();

        // every node's best partner has score 5
        assert_eq!(upper_bound(&matrix, &all, BoundKind::Clamped), 10.0);
        assert_eq!(upper_bound(&matrix, &NodeMask::empty(), BoundKind::Clamped), 0.0);
        assert_eq!(
            upper_bound(&matrix, &all.without_pair(0, 1), BoundKind::Unclamped),
            5.0
        );
    }

    #[test]
    fn cache_is_write_once() {
        let matrix = scenario_a();
        let mut cache = BoundCache::new(BoundKind::Clamped);
        let state = matrix.all_nodes().without_pair(0, 2);

        assert_eq!(cache.get(&state), None);
        assert_eq!(cache.get_or_compute(&matrix, &state), 1.0);
        assert_eq!(cache.get_or_compute(&matrix, &state), 1.0);
        assert_eq!(cache.get(&state), Some(1.0));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.number_of_cache_misses(), 1);
        assert_eq!(cache.number_of_cache_hits(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.number_of_cache_hits(), 0);
    }

    #[test]
    fn sound_on_non_negative_subproblems() {
        let mut rng = Pcg64::seed_from_u64(0xb0b);

        for _ in 0..50 {
            let n = 2 * rng.gen_range(1..=5);
            let matrix = WeightMatrix::random_uniform(&mut rng, n, 0.0..10.0);

            // remove a random set of pairs to obtain a reachable sub-state
            let mut state = matrix.all_nodes();
            for u in 0..n / 2 {
                if rng.gen_bool(0.3) {
                    state = state.without_pair(2 * u, 2 * u + 1);
                }
            }

            let optimum = naive_solver(&restrict(&matrix, &state)).unwrap().score;
            let bound = upper_bound(&matrix, &state, BoundKind::Clamped);
            assert!(bound + 1e-9 >= optimum, "bound {bound} < optimum {optimum}");
            assert_eq!(bound, upper_bound(&matrix, &state, BoundKind::Unclamped));
        }
    }

    #[test]
    fn negative_scores() {
        let matrix = all_negative_fixture();
        let all = matrix.all_nodes();
        let optimum = naive_solver(&matrix).unwrap().score;

        // the clamp lets every node contribute zero, which is a valid but loose bound
        let clamped = upper_bound(&matrix, &all, BoundKind::Clamped);
        let unclamped = upper_bound(&matrix, &all, BoundKind::Unclamped);

        assert_eq!(clamped, 0.0);
        assert!(unclamped < clamped);
        assert!(unclamped >= optimum);
        assert_eq!(optimum, -4.0);
        assert_eq!(unclamped, -3.0);
    }
}
