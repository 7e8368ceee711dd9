use crate::{
    errors::InvariantCheck,
    exact::PairingSolution,
    graph::*,
    io::ScoreFileReader,
    utils::Pairing,
};
use glob::glob;

/// Four students forming two obvious couples: `{(0, 1), (2, 3)}` scores 10
pub fn scenario_a() -> WeightMatrix {
    WeightMatrix::try_from_edges(
        4,
        [
            (0, 1, 5.0),
            (0, 2, 1.0),
            (0, 3, 1.0),
            (1, 2, 1.0),
            (1, 3, 1.0),
            (2, 3, 5.0),
        ],
        0.0,
        DuplicatePolicy::Reject,
    )
    .unwrap()
}

/// Six students for which the greedy first descent `(0,1), (2,5), (3,4)` scores only 1.7
pub fn scenario_b() -> WeightMatrix {
    WeightMatrix::try_from_edges(
        6,
        [
            (0, 1, 0.9),
            (0, 2, 0.8),
            (0, 3, 0.15),
            (0, 4, 0.3),
            (0, 5, 0.25),
            (1, 2, 0.35),
            (1, 3, 0.4),
            (1, 4, 0.8),
            (1, 5, 0.05),
            (2, 3, 0.1),
            (2, 4, 0.45),
            (2, 5, 0.6),
            (3, 4, 0.2),
            (3, 5, 0.75),
            (4, 5, 0.1),
        ],
        0.0,
        DuplicatePolicy::Reject,
    )
    .unwrap()
}

pub const SCENARIO_B_OPTIMUM: Score = 2.35;

pub fn scenario_b_pairing() -> Pairing {
    let mut pairing = Pairing::new(6);
    pairing.push(0, 2);
    pairing.push(1, 4);
    pairing.push(3, 5);
    pairing
}

/// Four students who dislike each other; the best pairings `{(0,1),(2,3)}` and `{(0,2),(1,3)}`
/// both score -4
pub fn all_negative_fixture() -> WeightMatrix {
    WeightMatrix::try_from_edges(
        4,
        [
            (0, 1, -1.0),
            (0, 2, -2.0),
            (0, 3, -5.0),
            (1, 2, -5.0),
            (1, 3, -2.0),
            (2, 3, -3.0),
        ],
        0.0,
        DuplicatePolicy::Reject,
    )
    .unwrap()
}

/// Returns the sub-matrix induced by `state`, relabelling its nodes to `0..|state|`
pub fn restrict(matrix: &WeightMatrix, state: &NodeMask) -> WeightMatrix {
    let nodes: Vec<Node> = state.iter_set_bits().collect();
    WeightMatrix::from_fn(nodes.len() as NumNodes, |u, v| {
        matrix.weight(nodes[u as usize], nodes[v as usize])
    })
}

pub fn assert_valid_solution(matrix: &WeightMatrix, solution: &PairingSolution) {
    assert_eq!(solution.pairing.number_of_nodes(), matrix.number_of_nodes());
    assert!(
        solution.pairing.is_correct().is_ok(),
        "{:?}",
        solution.pairing.is_correct()
    );
    assert!((solution.pairing.total_score(matrix) - solution.score).abs() < 1e-9);
}

/// Loads all score files matching `pattern` (relative to the crate root)
pub fn get_test_instances(pattern: &str) -> impl Iterator<Item = (String, WeightMatrix)> {
    glob(pattern).expect("Failed to glob").map(|path| {
        let path = path.expect("Failed to access globbed path");
        let filename = String::from(path.to_str().unwrap());
        let (matrix, _names) = WeightMatrix::try_read_scores_file(&path)
            .unwrap_or_else(|e| panic!("Cannot read {filename}: {e}"));
        (filename, matrix)
    })
}
