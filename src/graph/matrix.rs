use super::*;
use crate::errors::{InputError, InvariantCheck, MatrixError, Result};
use fxhash::FxHashMap;

/// What to do if an edge list contains the same unordered pair more than once
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The last occurrence wins
    #[default]
    Overwrite,

    /// Duplicates with a different score raise [`InputError::AsymmetricInput`]; exact repetitions
    /// are accepted
    Reject,
}

/// Dense symmetric `n x n` score table. Every write updates both `(u, v)` and `(v, u)`, hence the
/// matrix is symmetric by construction. The diagonal is never read by the solvers.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMatrix {
    number_of_nodes: NumNodes,
    weights: Vec<Score>,
}

impl GraphNodeOrder for WeightMatrix {
    fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }
}

impl WeightLookup for WeightMatrix {
    #[inline]
    fn weight(&self, u: Node, v: Node) -> Score {
        self.weights[self.idx(u, v)]
    }
}

impl WeightMatrix {
    /// Creates a matrix with `n` nodes in which every pair has score `0.0`
    pub fn new(n: NumNodes) -> Self {
        Self {
            number_of_nodes: n,
            weights: vec![0.0; (n as usize) * (n as usize)],
        }
    }

    /// Creates a matrix with `n` nodes in which every pair has score `fill`. Odd `n` is accepted
    /// here; the solvers reject it.
    pub fn try_new(n: NumNodes, fill: Score) -> Result<Self> {
        if !fill.is_finite() {
            return Err(InputError::InvalidInput(format!(
                "fill score {fill} is not finite"
            )));
        }

        let mut matrix = Self::new(n);
        matrix.weights.fill(fill);
        Ok(matrix)
    }

    /// Builds the matrix by evaluating `f(u, v)` for each pair `u < v`.
    /// ** Panics if f returns a score that is not finite **
    pub fn from_fn(n: NumNodes, mut f: impl FnMut(Node, Node) -> Score) -> Self {
        let mut matrix = Self::new(n);
        for u in 0..n {
            for v in (u + 1)..n {
                matrix.set_weight(u, v, f(u, v));
            }
        }
        matrix
    }

    /// Builds a matrix from an edge list. Pairs not mentioned keep the score `fill`.
    ///
    /// Fails with [`InputError::InvalidInput`] if `n` is zero or odd (no perfect matching
    /// exists), if an edge is a loop or references a node `>= n`, or if a score is not finite.
    pub fn try_from_edges(
        n: NumNodes,
        edges: impl IntoIterator<Item = impl Into<WeightedEdge>>,
        fill: Score,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        if n == 0 {
            return Err(InputError::InvalidInput(String::from(
                "cannot build a score matrix without entities",
            )));
        }
        if n % 2 == 1 {
            return Err(InputError::odd_number_of_nodes(n));
        }

        let mut matrix = Self::try_new(n, fill)?;
        let mut seen: FxHashMap<Edge, Score> = FxHashMap::default();

        for edge in edges {
            let WeightedEdge(u, v, w) = edge.into().normalized();

            if v >= n {
                return Err(InputError::InvalidInput(format!(
                    "edge ({u}, {v}) references a node outside of [0, {n})"
                )));
            }
            if u == v {
                return Err(InputError::InvalidInput(format!("loop at node {u}")));
            }
            if !w.is_finite() {
                return Err(InputError::InvalidInput(format!(
                    "score of edge ({u}, {v}) is not finite"
                )));
            }

            if let Some(previous) = seen.insert(Edge(u, v), w)
                && policy == DuplicatePolicy::Reject
                && previous != w
            {
                return Err(InputError::AsymmetricInput {
                    u,
                    v,
                    previous,
                    current: w,
                });
            }

            matrix.set_weight(u, v, w);
        }

        Ok(matrix)
    }

    #[inline]
    fn idx(&self, u: Node, v: Node) -> usize {
        assert!(u < self.number_of_nodes && v < self.number_of_nodes);
        (u as usize) * (self.number_of_nodes as usize) + v as usize
    }

    /// Stores `w` for both `(u, v)` and `(v, u)` and returns the previous score.
    /// ** Panics if u == v or w is not finite **
    pub fn set_weight(&mut self, u: Node, v: Node, w: Score) -> Score {
        assert_ne!(u, v);
        assert!(w.is_finite(), "score of ({u}, {v}) is not finite: {w}");
        let uv = self.idx(u, v);
        let vu = self.idx(v, u);
        let prev = self.weights[uv];
        self.weights[uv] = w;
        self.weights[vu] = w;
        prev
    }

    /// Iterates over all pairs `u < v` together with their score
    pub fn edges(&self) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.vertices().flat_map(move |u| {
            ((u + 1)..self.number_of_nodes).map(move |v| WeightedEdge(u, v, self.weight(u, v)))
        })
    }

    /// Returns true if no pair has a negative score; only then the bound oracle's clamp at zero
    /// coincides with the unclamped relaxation.
    pub fn is_non_negative(&self) -> bool {
        self.edges().all(|e| e.score() >= 0.0)
    }

    /// Returns the set of all nodes, i.e. the initial search state
    pub fn all_nodes(&self) -> NodeMask {
        NodeMask::full(self.number_of_nodes)
    }
}

impl InvariantCheck<MatrixError> for WeightMatrix {
    fn is_correct(&self) -> std::result::Result<(), MatrixError> {
        for u in self.vertices() {
            for v in (u + 1)..self.number_of_nodes {
                let forward = self.weights[self.idx(u, v)];
                let backward = self.weights[self.idx(v, u)];
                if !forward.is_finite() || !backward.is_finite() {
                    return Err(MatrixError::NonFinite(u, v));
                }
                if forward != backward {
                    return Err(MatrixError::Asymmetric {
                        u,
                        v,
                        forward,
                        backward,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn symmetric_writes() {
        let mut matrix = WeightMatrix::new(4);
        assert_eq!(matrix.set_weight(2, 1, 3.5), 0.0);
        assert_eq!(matrix.weight(1, 2), 3.5);
        assert_eq!(matrix.weight(2, 1), 3.5);
        assert_eq!(matrix.set_weight(1, 2, -1.0), 3.5);
        assert_eq!(matrix.weight(2, 1), -1.0);
        assert!(matrix.is_correct().is_ok());
        assert!(!matrix.is_non_negative());
    }

    #[test]
    fn from_edges() {
        let matrix = WeightMatrix::try_from_edges(
            4,
            [(0, 1, 5.0), (3, 2, 5.0), (0, 2, 1.0)],
            -2.0,
            DuplicatePolicy::Overwrite,
        )
        .unwrap();

        assert_eq!(matrix.number_of_nodes(), 4);
        assert_eq!(matrix.weight(2, 3), 5.0);
        assert_eq!(matrix.weight(1, 3), -2.0);
        assert_eq!(matrix.edges().count(), 6);
        assert_eq!(
            matrix.edges().map(|e| e.edge()).collect_vec(),
            [Edge(0, 1), Edge(0, 2), Edge(0, 3), Edge(1, 2), Edge(1, 3), Edge(2, 3)]
        );
    }

    #[test]
    fn from_edges_rejects_invalid() {
        let policy = DuplicatePolicy::Overwrite;
        let no_edges: [(Node, Node, Score); 0] = [];

        assert!(matches!(
            WeightMatrix::try_from_edges(0, no_edges, 0.0, policy),
            Err(InputError::InvalidInput(_))
        ));
        assert!(matches!(
            WeightMatrix::try_from_edges(3, no_edges, 0.0, policy),
            Err(InputError::InvalidInput(_))
        ));
        assert!(matches!(
            WeightMatrix::try_from_edges(2, [(0, 2, 1.0)], 0.0, policy),
            Err(InputError::InvalidInput(_))
        ));
        assert!(matches!(
            WeightMatrix::try_from_edges(2, [(1, 1, 1.0)], 0.0, policy),
            Err(InputError::InvalidInput(_))
        ));
        assert!(matches!(
            WeightMatrix::try_from_edges(2, [(0, 1, f64::NAN)], 0.0, policy),
            Err(InputError::InvalidInput(_))
        ));
        assert!(matches!(
            WeightMatrix::try_new(4, f64::INFINITY),
            Err(InputError::InvalidInput(_))
        ));
    }

    #[test]
    fn duplicates() {
        let edges = [(0, 1, 1.0), (1, 0, 2.0)];

        let matrix =
            WeightMatrix::try_from_edges(2, edges, 0.0, DuplicatePolicy::Overwrite).unwrap();
        assert_eq!(matrix.weight(0, 1), 2.0);

        assert!(matches!(
            WeightMatrix::try_from_edges(2, edges, 0.0, DuplicatePolicy::Reject),
            Err(InputError::AsymmetricInput { u: 0, v: 1, .. })
        ));

        // exact repetitions are fine
        assert!(
            WeightMatrix::try_from_edges(2, [(0, 1, 1.0), (1, 0, 1.0)], 0.0, DuplicatePolicy::Reject)
                .is_ok()
        );
    }

    #[test]
    #[should_panic]
    fn non_finite_scores_are_rejected() {
        WeightMatrix::from_fn(4, |u, v| if u + v == 3 { f64::NAN } else { 1.0 });
    }

    #[test]
    #[should_panic]
    fn infinite_score_is_rejected() {
        let mut matrix = WeightMatrix::new(4);
        matrix.set_weight(0, 1, f64::NEG_INFINITY);
    }

    #[test]
    fn wide_instances() {
        let matrix = WeightMatrix::try_new(130, 1.5).unwrap();
        assert_eq!(matrix.number_of_nodes(), 130);
        assert_eq!(matrix.weight(0, 129), 1.5);
        assert_eq!(matrix.all_nodes().cardinality(), 130);
    }

    #[test]
    fn heaviest_partner() {
        let matrix = WeightMatrix::from_fn(6, |u, v| ((u + v) % 3) as f64);
        let all = matrix.all_nodes();

        // weights of 0: 1, 2, 0, 1, 2 -> first maximum is node 2
        assert_eq!(matrix.heaviest_partner_within(0, &all), Some((2, 2.0)));
        assert_eq!(
            matrix.heaviest_partner_within(0, &NodeMask::new_with_bits_set([0, 3])),
            Some((3, 0.0))
        );
        assert_eq!(
            matrix.heaviest_partner_within(0, &NodeMask::new_with_bits_set([0])),
            None
        );
    }
}
