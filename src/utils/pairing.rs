use crate::{
    errors::{InvariantCheck, PairingError},
    graph::*,
};
use serde::Serialize;

/// An ordered sequence of disjoint pairs. During the search it is used as a stack (the partial
/// pairing of the current path); as a result it is a perfect matching on `0..number_of_nodes`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Pairing {
    number_of_nodes: NumNodes,
    pairs: Vec<Edge>,
}

impl Pairing {
    pub fn new(number_of_nodes: NumNodes) -> Self {
        Self {
            number_of_nodes,
            pairs: Vec::with_capacity(number_of_nodes as usize / 2),
        }
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    /// Appends the pair `(u, v)`.
    ///
    /// # Example
    /// ```
    /// use pairing::utils::Pairing;
    /// let mut pairing = Pairing::new(4);
    /// pairing.push(0, 3);
    /// assert_eq!(pairing.len(), 1);
    /// ```
    pub fn push(&mut self, u: Node, v: Node) {
        assert!(u < self.number_of_nodes && v < self.number_of_nodes);
        self.pairs.push(Edge(u, v));
    }

    /// Removes the most recently added pair
    pub fn pop(&mut self) -> Option<Edge> {
        self.pairs.pop()
    }

    /// Returns the number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.pairs.iter()
    }

    pub fn pairs(&self) -> &[Edge] {
        &self.pairs
    }

    /// Copies the content of `other` into `self` reusing the allocation of `self`
    pub fn clone_from_pairing(&mut self, other: &Pairing) {
        self.number_of_nodes = other.number_of_nodes;
        self.pairs.clone_from(&other.pairs);
    }

    /// Returns true if `self` is a perfect matching
    pub fn is_perfect(&self) -> bool {
        self.is_correct().is_ok()
    }

    /// Sums the scores of all pairs
    pub fn total_score<W: WeightLookup>(&self, weights: &W) -> Score {
        self.pairs.iter().map(|&Edge(u, v)| weights.weight(u, v)).sum()
    }

    /// Returns the set of nodes covered by some pair
    pub fn covered(&self) -> NodeMask {
        self.pairs.iter().flat_map(|&Edge(u, v)| [u, v]).collect()
    }

    /// Returns the same matching with each pair normalized and the pairs sorted, which is a
    /// canonical representation of the unordered matching.
    pub fn normalized(&self) -> Pairing {
        let mut pairs: Vec<Edge> = self.pairs.iter().map(|e| e.normalized()).collect();
        pairs.sort_unstable();
        Self {
            number_of_nodes: self.number_of_nodes,
            pairs,
        }
    }
}

impl InvariantCheck<PairingError> for Pairing {
    fn is_correct(&self) -> std::result::Result<(), PairingError> {
        let mut seen = vec![false; self.number_of_nodes as usize];

        for &Edge(u, v) in &self.pairs {
            if u == v {
                return Err(PairingError::Loop(u));
            }

            for x in [u, v] {
                let entry = seen
                    .get_mut(x as usize)
                    .ok_or(PairingError::OutOfRange(x))?;
                if *entry {
                    return Err(PairingError::Duplicate(x));
                }
                *entry = true;
            }
        }

        match seen.iter().position(|&s| !s) {
            Some(u) => Err(PairingError::Uncovered(u as Node)),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a Pairing {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
