use crate::{graph::*, utils::Pairing};

/// Best complete pairing found so far. The first complete pairing is always recorded (even if its
/// score overflowed to `-inf`); afterwards it is only replaced by a strictly better one.
#[derive(Clone, Debug)]
pub(super) struct Incumbent {
    score: Option<Score>,
    pairing: Pairing,
}

impl Incumbent {
    pub(super) fn new(number_of_nodes: NumNodes) -> Self {
        Self {
            score: None,
            pairing: Pairing::new(number_of_nodes),
        }
    }

    /// Returns the score of the incumbent, or `-inf` if none was recorded yet. As a pruning
    /// threshold, `-inf` never prunes.
    pub(super) fn score(&self) -> Score {
        self.score.unwrap_or(Score::NEG_INFINITY)
    }

    pub(super) fn pairing(&self) -> &Pairing {
        &self.pairing
    }

    pub(super) fn is_set(&self) -> bool {
        self.score.is_some()
    }

    /// Replaces the incumbent if none is set or `score` is strictly larger. Returns true on
    /// replacement.
    pub(super) fn try_improve(&mut self, score: Score, pairing: &Pairing) -> bool {
        if self.score.is_some_and(|best| score <= best) {
            return false;
        }

        self.score = Some(score);
        self.pairing.clone_from_pairing(pairing);
        true
    }
}
