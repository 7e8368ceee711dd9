use super::*;
use smallvec::SmallVec;
use std::fmt::{self, Debug, Formatter};

pub type Bitmask = u64;
pub const BITS_IN_MASK: usize = Bitmask::BITS as usize;

const INLINE_WORDS: usize = 2;

/// Sets over nodes `0..INLINE_NODES` are stored without heap allocation.
pub const INLINE_NODES: NumNodes = (INLINE_WORDS * BITS_IN_MASK) as NumNodes;

type Words = SmallVec<[Bitmask; INLINE_WORDS]>;

/// A set of nodes of arbitrary width. It serves as the search state of the exact solvers (the
/// set of still unmatched nodes) and as the key of the bound cache. Up to [`INLINE_NODES`] nodes
/// the words live inline, so cloning and hashing stay cheap for typical instances.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeMask {
    // never ends with a zero word, hence equal sets have equal representations
    words: Words,
}

impl NodeMask {
    /// Returns the empty set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the set `{0, 1, ..., n-1}`
    pub fn full(n: NumNodes) -> Self {
        let n = n as usize;
        let mut words = Words::from_elem(Bitmask::MAX, n / BITS_IN_MASK);
        if n % BITS_IN_MASK > 0 {
            words.push((1 << (n % BITS_IN_MASK)) - 1);
        }
        Self { words }
    }

    pub fn new_with_bits_set(bits: impl IntoIterator<Item = Node>) -> Self {
        let mut res = Self::empty();
        for u in bits {
            res.set_bit(u);
        }
        res
    }

    /// Returns the underlying words; bit `i` of word `j` represents node `64j + i`
    pub fn words(&self) -> &[Bitmask] {
        &self.words
    }

    /// Returns true if the set does not use heap memory
    pub fn is_inline(&self) -> bool {
        !self.words.spilled()
    }

    #[inline]
    fn position(u: Node) -> (usize, Bitmask) {
        let u = u as usize;
        (u / BITS_IN_MASK, 1 << (u % BITS_IN_MASK))
    }

    #[inline]
    pub fn get_bit(&self, u: Node) -> bool {
        let (idx, bit) = Self::position(u);
        self.words.get(idx).is_some_and(|w| w & bit != 0)
    }

    /// Sets the bit of `u` and returns its previous value
    pub fn set_bit(&mut self, u: Node) -> bool {
        let (idx, bit) = Self::position(u);
        if idx >= self.words.len() {
            self.words.resize(idx + 1, 0);
        }
        let prev = self.words[idx] & bit != 0;
        self.words[idx] |= bit;
        prev
    }

    /// Clears the bit of `u` and returns its previous value
    pub fn unset_bit(&mut self, u: Node) -> bool {
        let (idx, bit) = Self::position(u);
        let Some(word) = self.words.get_mut(idx) else {
            return false;
        };
        let prev = *word & bit != 0;
        *word &= !bit;
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
        prev
    }

    /// Returns a copy of this set without `u`
    pub fn without(&self, u: Node) -> Self {
        let mut res = self.clone();
        res.unset_bit(u);
        res
    }

    /// Returns a copy of this set without `u` and `v`
    pub fn without_pair(&self, u: Node, v: Node) -> Self {
        let mut res = self.clone();
        res.unset_bit(u);
        res.unset_bit(v);
        res
    }

    pub fn cardinality(&self) -> NumNodes {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns the smallest node in the set or `None` if the set is empty
    pub fn lowest_set_bit(&self) -> Option<Node> {
        let idx = self.words.iter().position(|&w| w != 0)?;
        Some((idx * BITS_IN_MASK) as Node + self.words[idx].trailing_zeros())
    }

    /// Iterates over all nodes in the set in increasing order
    pub fn iter_set_bits(&self) -> impl Iterator<Item = Node> + '_ {
        self.words.iter().enumerate().flat_map(|(idx, &word)| {
            let offset = (idx * BITS_IN_MASK) as Node;
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let u = rest.trailing_zeros();
                rest &= rest - 1;
                Some(offset + u)
            })
        })
    }
}

impl Debug for NodeMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_set_bits()).finish()
    }
}

impl FromIterator<Node> for NodeMask {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self::new_with_bits_set(iter)
    }
}
