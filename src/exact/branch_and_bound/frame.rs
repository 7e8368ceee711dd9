use super::*;
use log::trace;
use smallvec::SmallVec;

/// Partners of the pivot in the order in which they are tried
type Candidates = SmallVec<[Node; 24]>;

/// One level of the depth-first search (see also [`BranchAndBound`]). After construction, the
/// computation starts with [`Frame::initialize`]. It either completes directly (complete pairing or
/// pruned) by returning [`BBResult::Completed`], or branches into the first partner by returning
/// [`BBResult::Branch`]. Once that child completed, [`Frame::resume`] continues with the next
/// partner.
pub(super) struct Frame {
    /// Unmatched nodes at this level
    pub(super) state: NodeMask,

    /// Score of the partial pairing leading to this frame
    pub(super) score: Score,

    /// Smallest node of `state`; only meaningful after initialization
    pivot: Node,

    candidates: Candidates,
    next_candidate: usize,
    initialized: bool,
}

impl Frame {
    pub(super) fn new(state: NodeMask, score: Score) -> Self {
        Self {
            state,
            score,
            pivot: 0,
            candidates: Candidates::new(),
            next_candidate: 0,
            initialized: false,
        }
    }

    pub(super) fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Handles complete pairings and pruning, and otherwise fixes the pivot and the order of its
    /// partners.
    pub(super) fn initialize<W: WeightLookup>(&mut self, ctx: &mut SearchContext<W>) -> BBResult {
        self.initialized = true;

        let Some(pivot) = self.state.lowest_set_bit() else {
            let improved = ctx.incumbent.try_improve(self.score, &ctx.current);
            ctx.stats.on_complete_pairing(improved);
            if improved {
                ctx.on_improvement();
            }
            return BBResult::Completed;
        };

        // non-strict: a subtree that can at best tie the incumbent is skipped as well
        let bound = ctx.cache.get_or_compute(ctx.weights, &self.state);
        if ctx.incumbent.is_set() && self.score + bound <= ctx.incumbent.score() {
            trace!(
                "Prune {:?} score: {} bound: {} incumbent: {}",
                self.state,
                self.score,
                bound,
                ctx.incumbent.score()
            );
            ctx.stats.on_pruned();
            return BBResult::Completed;
        }

        self.pivot = pivot;
        self.candidates = self.state.without(pivot).iter_set_bits().collect();

        // stable sort: equally good partners keep increasing id order
        let weights = ctx.weights;
        self.candidates
            .sort_by(|&a, &b| weights.weight(pivot, b).total_cmp(&weights.weight(pivot, a)));

        self.resume(ctx)
    }

    /// Called after initialization and each time the previous child completed. Undoes the child's
    /// pair and branches into the next partner.
    pub(super) fn resume<W: WeightLookup>(&mut self, ctx: &mut SearchContext<W>) -> BBResult {
        if self.next_candidate > 0 {
            ctx.current.pop();
        }

        let Some(&partner) = self.candidates.get(self.next_candidate) else {
            return BBResult::Completed;
        };

        if ctx.budget_exhausted() {
            return BBResult::Abort;
        }

        self.next_candidate += 1;
        ctx.current.push(self.pivot, partner);

        BBResult::Branch(Frame::new(
            self.state.without_pair(self.pivot, partner),
            self.score + ctx.weights.weight(self.pivot, partner),
        ))
    }

    /// Human readable summary used when dumping the stack of an aborted search
    pub(super) fn describe(&self) -> String {
        if !self.initialized {
            return format!("UNINITIALIZED {:?} score: {}", self.state, self.score);
        }

        format!(
            "pivot: {} tried: {}/{} score: {}",
            self.pivot,
            self.next_candidate,
            self.candidates.len(),
            self.score
        )
    }
}
