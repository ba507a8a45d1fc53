//! Error taxonomy for the algorithm surface.
//!
//! Only [`GraphError::UnknownEndpoint`] and [`GraphError::UnknownNode`]
//! indicate malformed input; the remaining variants are ordinary negative
//! outcomes an algorithm reports about a well-formed graph.

/// Errors and negative outcomes returned by graph construction and the
/// algorithm modules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge references a node absent from an explicitly supplied node set.
    #[error("edge endpoint {0} is not in the supplied node set")]
    UnknownEndpoint(String),

    /// An algorithm was asked to start from a node the graph does not contain.
    #[error("node {0} is not in the graph")]
    UnknownNode(String),

    /// Bellman-Ford's verification pass found an improvable edge, so no
    /// consistent distance assignment exists.
    #[error("a negative-weight cycle is reachable from the source")]
    NegativeCycle,

    /// The degree conditions for an Eulerian trail are not met.
    #[error("the edge set admits no Eulerian path")]
    NoEulerianPath,

    /// The 2-SAT clause set admits no assignment.
    #[error("the clause set is unsatisfiable")]
    Unsatisfiable,

    /// The paired-path search gave up before exhausting the search space.
    #[error("paired-path search exceeded its step budget")]
    BudgetExhausted,
}
