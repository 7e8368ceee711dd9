use crate::graph::{Node, NumNodes};
use std::error::Error;
use thiserror::Error;

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> std::result::Result<(), E>;
}

/// Everything that can go wrong before a search even starts. The solvers themselves do not fail
/// on validated input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflicting scores for pair ({u}, {v}): {previous} vs. {current}")]
    AsymmetricInput {
        u: Node,
        v: Node,
        previous: f64,
        current: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InputError>;

impl InputError {
    pub(crate) fn odd_number_of_nodes(n: NumNodes) -> Self {
        InputError::InvalidInput(format!(
            "{n} entities cannot be partitioned into pairs; a perfect matching requires an even count"
        ))
    }
}

/// Violations of the perfect-matching property of a [`crate::utils::Pairing`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("node {0} is out of range")]
    OutOfRange(Node),

    #[error("node {0} is paired with itself")]
    Loop(Node),

    #[error("node {0} appears in more than one pair")]
    Duplicate(Node),

    #[error("node {0} is not covered by any pair")]
    Uncovered(Node),
}

/// Violations of the weight matrix invariants
#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("weight({u}, {v}) = {forward} differs from weight({v}, {u}) = {backward}")]
    Asymmetric {
        u: Node,
        v: Node,
        forward: f64,
        backward: f64,
    },

    #[error("weight({0}, {1}) is not finite")]
    NonFinite(Node, Node),
}
