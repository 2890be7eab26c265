use super::Edge;
use thiserror::Error;

/// Errors raised while building a graph.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    #[error("vertex {0} is not in the graph")]
    MissingVertex(usize),
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),
}

/// A matching or a path that breaks the structure it claims to have.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum StructuralError {
    #[error("vertex {vertex} is covered by both {first} and {second}")]
    SharedVertex {
        vertex: usize,
        first: Edge,
        second: Edge,
    },
    #[error("matched edge {0} is not in the graph")]
    MissingEdge(Edge),
    #[error("matched edge {0} is a self-loop")]
    SelfLoop(Edge),
    #[error("path {0:?} is not an augmenting path")]
    NotAugmenting(Vec<usize>),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors that abort a maximum matching computation.
///
/// Unlike running out of augmenting paths, an `InconclusiveLift` leaves the maximality of the
/// matching unknown.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("invalid input: {0}")]
    Structural(#[from] StructuralError),
    #[error("cannot lift path {path:?} through blossom {blossom:?} contracted into {pseudo}")]
    InconclusiveLift {
        pseudo: usize,
        blossom: Vec<usize>,
        path: Vec<usize>,
    },
}

impl From<GraphError> for Error {
    fn from(error: GraphError) -> Self {
        Self::Structural(error.into())
    }
}
