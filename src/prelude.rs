//! One-stop imports for callers that want the whole toolkit in scope.

pub use crate::distance::{Distance, DistanceMap};
pub use crate::error::GraphError;
pub use crate::euler::ReadPair;
pub use crate::graph::{Directedness, Edge, Graph, NodeKey};
pub use crate::scc::Partition;
pub use crate::search::BfsIterator;
pub use crate::shortest_path::{path_from_predecessors, PairwiseDistances};
pub use crate::two_sat::TwoSat;
