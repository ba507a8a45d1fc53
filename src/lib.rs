//! A directed/undirected graph library built around one concrete
//! [`Graph`] type: traversal, ordering, shortest paths, strong
//! connectivity, 2-SAT, and Eulerian trails.
//!
//! Nodes are caller-supplied values (anything [`Clone`] + [`Eq`] +
//! [`Hash`](std::hash::Hash) + [`Ord`]); algorithms map them to dense
//! indices internally and hand results back in terms of the caller's
//! values.

pub mod distance;
pub mod error;
pub mod euler;
pub mod graph;
pub mod order;
pub mod scc;
pub mod search;
pub mod shortest_path;
pub mod two_sat;

pub mod prelude;

pub use crate::distance::{Distance, DistanceMap};
pub use crate::error::GraphError;
pub use crate::graph::{Directedness, Edge, Graph, NodeKey};
