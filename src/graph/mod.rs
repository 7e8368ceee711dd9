pub mod edge;
pub mod mask;
pub mod matrix;
pub mod random;

pub type Node = u32;
pub type NumNodes = Node;
pub type Score = f64;

use std::ops::Range;

pub use edge::*;
pub use mask::*;
pub use matrix::*;
pub use random::*;

/// Provides getters pertaining to the number of entities of an instance
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over V.
    fn vertices(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns true if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read access to the symmetric pairwise scores
pub trait WeightLookup: GraphNodeOrder {
    /// Returns the score of the unordered pair `{u, v}`.
    /// ** Panics if u >= n or v >= n **
    fn weight(&self, u: Node, v: Node) -> Score;

    /// Returns the node `v != u` within `candidates` maximizing `weight(u, v)`, together
    /// with that weight. Ties are broken in favour of the smaller id.
    fn heaviest_partner_within(&self, u: Node, candidates: &NodeMask) -> Option<(Node, Score)> {
        let mut best: Option<(Node, Score)> = None;
        for v in candidates.iter_set_bits().filter(|&v| v != u) {
            let w = self.weight(u, v);
            if best.is_none_or(|(_, b)| w > b) {
                best = Some((v, w));
            }
        }
        best
    }
}
