use super::*;

/// Exhaustive reference solver: enumerates every perfect matching (always pairing the smallest
/// unmatched node next, partners in increasing order) without any pruning or caching. Meant as an
/// oracle for testing; the number of visited pairings is `(n-1)!!`.
///
/// `nodes_expanded` counts (pivot, partner) expansions exactly like [`BranchAndBound`] does, so
/// both counters are directly comparable.
pub fn naive_solver<W: WeightLookup>(weights: &W) -> Result<PairingSolution> {
    check_solvable(weights)?;

    let n = weights.number_of_nodes();
    let mut enumerator = Enumerator {
        weights,
        current: Pairing::new(n),
        best: Pairing::new(n),
        best_score: None,
        nodes_expanded: 0,
    };

    enumerator.recurse(NodeMask::full(n), 0.0);

    Ok(PairingSolution {
        // the enumeration reaches at least one complete pairing, even for n = 0
        score: enumerator.best_score.unwrap_or_default(),
        pairing: enumerator.best,
        nodes_expanded: enumerator.nodes_expanded,
        optimal: true,
    })
}

struct Enumerator<'a, W> {
    weights: &'a W,
    current: Pairing,
    best: Pairing,
    best_score: Option<Score>,
    nodes_expanded: u64,
}

impl<W: WeightLookup> Enumerator<'_, W> {
    fn recurse(&mut self, state: NodeMask, score: Score) {
        let Some(pivot) = state.lowest_set_bit() else {
            if self.best_score.is_none_or(|best| score > best) {
                self.best_score = Some(score);
                self.best.clone_from_pairing(&self.current);
            }
            return;
        };

        let rest = state.without(pivot);
        for partner in rest.iter_set_bits() {
            self.nodes_expanded += 1;
            self.current.push(pivot, partner);
            self.recurse(
                rest.without(partner),
                score + self.weights.weight(pivot, partner),
            );
            self.current.pop();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;

    #[test]
    fn trivial() {
        let solution = naive_solver(&WeightMatrix::new(0)).unwrap();
        assert_eq!(solution.score, 0.0);
        assert!(solution.pairing.is_empty());
        assert_eq!(solution.nodes_expanded, 0);

        assert!(matches!(
            naive_solver(&WeightMatrix::new(5)),
            Err(InputError::InvalidInput(_))
        ));
    }

    #[test]
    fn scenario() {
        let solution = naive_solver(&scenario_a()).unwrap();
        assert_eq!(solution.score, 10.0);
        assert_eq!(solution.pairing.pairs(), &[Edge(0, 1), Edge(2, 3)]);
        assert!(solution.pairing.is_perfect());
    }

    #[test]
    fn enumerates_every_pairing() {
        // (n-1) choices for the pivot's partner, then recurse on n-2 nodes
        let mut expected = 0;
        for n in (2..=10).step_by(2) {
            expected = (n as u64 - 1) * (1 + expected);
            let solution = naive_solver(&WeightMatrix::new(n)).unwrap();
            assert_eq!(solution.nodes_expanded, expected, "n = {n}");
        }
    }

    #[test]
    fn overflowing_scores() {
        // every pairing sums to -inf; the first one is still recorded
        let matrix = WeightMatrix::from_fn(4, |_, _| -1e308);
        let solution = naive_solver(&matrix).unwrap();

        assert_eq!(solution.score, Score::NEG_INFINITY);
        assert_eq!(solution.pairing.pairs(), &[Edge(0, 1), Edge(2, 3)]);
        assert!(solution.pairing.is_perfect());
    }

    #[test]
    fn first_optimum_wins_ties() {
        // all pairings score zero, the first one enumerated is kept
        let solution = naive_solver(&WeightMatrix::new(6)).unwrap();
        assert_eq!(
            solution.pairing.pairs(),
            &[Edge(0, 1), Edge(2, 3), Edge(4, 5)]
        );
    }
}
