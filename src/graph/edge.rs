use super::*;
use serde::Serialize;

pub trait EdgeOps {
    fn normalized(&self) -> Self;
    fn is_normalized(&self) -> bool;
    fn is_loop(&self) -> bool;
    fn reverse(&self) -> Self;
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize)]
pub struct Edge(pub Node, pub Node);

/// An edge of the complete score graph. Scores are plain `f64`, hence no `Eq`/`Hash`.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Serialize)]
pub struct WeightedEdge(pub Node, pub Node, pub Score);

impl EdgeOps for Edge {
    fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }
}

impl EdgeOps for WeightedEdge {
    fn normalized(&self) -> Self {
        let Edge(u, v) = self.edge().normalized();
        WeightedEdge(u, v, self.2)
    }

    fn is_normalized(&self) -> bool {
        self.edge().is_normalized()
    }

    fn is_loop(&self) -> bool {
        self.edge().is_loop()
    }

    fn reverse(&self) -> Self {
        WeightedEdge(self.1, self.0, self.2)
    }
}

impl WeightedEdge {
    pub fn edge(&self) -> Edge {
        Edge(self.0, self.1)
    }

    pub fn score(&self) -> Score {
        self.2
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<Edge> for (Node, Node) {
    fn from(value: Edge) -> Self {
        (value.0, value.1)
    }
}

impl From<(Node, Node, Score)> for WeightedEdge {
    fn from(value: (Node, Node, Score)) -> Self {
        WeightedEdge(value.0, value.1, value.2)
    }
}
