//! Acyclicity checking and topological ordering.

use std::collections::HashSet;

use bitvec::prelude::*;

use crate::graph::{Graph, NodeKey};
use crate::search::finish_order_into;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Finished,
}

impl<N: NodeKey> Graph<N> {
    /// Returns `true` iff the graph has no directed cycle.
    ///
    /// Three-state DFS: a cycle exists exactly when traversal encounters an
    /// edge into a node still in progress. Only the reported boolean is
    /// produced; the cycle itself is not located.
    pub fn is_acyclic(&self) -> bool {
        let adjacency = self.out_adjacency_indices();
        let mut marks = vec![Mark::Unvisited; self.num_nodes()];
        for root in 0..self.num_nodes() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::InProgress;
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            while let Some(&mut (node, ref mut child)) = stack.last_mut() {
                if *child < adjacency[node].len() {
                    let next = adjacency[node][*child];
                    *child += 1;
                    match marks[next] {
                        Mark::InProgress => return false,
                        Mark::Unvisited => {
                            marks[next] = Mark::InProgress;
                            stack.push((next, 0));
                        }
                        Mark::Finished => {}
                    }
                } else {
                    marks[node] = Mark::Finished;
                    stack.pop();
                }
            }
        }
        true
    }

    /// DFS finish order over every node, reversed.
    ///
    /// Precondition: the graph is acyclic. On cyclic input the returned
    /// sequence violates at least one edge; no attempt is made to detect or
    /// repair that here — pair with [`Graph::is_acyclic`] when in doubt.
    pub fn topological_sort(&self) -> Vec<N> {
        self.topological_indices()
            .into_iter()
            .map(|i| self.node_at(i).clone())
            .collect()
    }

    pub(crate) fn topological_indices(&self) -> Vec<usize> {
        let adjacency = self.out_adjacency_indices();
        let mut visited = bitvec![0; self.num_nodes()];
        let mut order = Vec::with_capacity(self.num_nodes());
        for root in 0..self.num_nodes() {
            finish_order_into(&adjacency, &mut visited, root, &mut order);
        }
        order.reverse();
        order
    }

    /// A Hamiltonian path exists in a DAG iff its topological order visits
    /// every consecutive pair along a direct edge; returns that order, or
    /// `None` when some consecutive pair is unconnected.
    pub fn hamiltonian_path(&self) -> Option<Vec<N>> {
        let order = self.topological_indices();
        let arcs: HashSet<(usize, usize)> = self
            .weighted_arcs()
            .into_iter()
            .map(|(t, h, _)| (t, h))
            .collect();
        for pair in order.windows(2) {
            if !arcs.contains(&(pair[0], pair[1])) {
                return None;
            }
        }
        Some(order.into_iter().map(|i| self.node_at(i).clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Directedness;

    #[test]
    fn dag_is_acyclic() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (1, 3), (2, 3), (3, 4)]);
        assert!(graph.is_acyclic());
    }

    #[test]
    fn back_edge_is_a_cycle() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 3), (3, 1)]);
        assert!(!graph.is_acyclic());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 2)]);
        assert!(!graph.is_acyclic());
    }

    #[test]
    fn cross_edges_are_not_cycles() {
        // Diamond: two paths meet at 4 without forming a cycle.
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert!(graph.is_acyclic());
    }

    #[test]
    fn topological_sort_respects_every_edge() {
        let graph = Graph::from_edges(
            Directedness::Directed,
            [(5, 3), (5, 1), (3, 2), (1, 2), (2, 4)],
        );
        let order = graph.topological_sort();
        assert_eq!(order.len(), 5);
        let pos = |n: i32| order.iter().position(|&x| x == n).unwrap();
        for edge in graph.edges() {
            assert!(pos(edge.tail) < pos(edge.head));
        }
    }

    #[test]
    fn topological_sort_covers_isolated_nodes() {
        let graph =
            Graph::with_nodes(Directedness::Directed, vec![1, 2, 3], [(1, 2)]).unwrap();
        assert_eq!(graph.topological_sort().len(), 3);
    }

    #[test]
    fn hamiltonian_path_on_a_chain() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 3), (3, 4)]);
        assert_eq!(graph.hamiltonian_path(), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn no_hamiltonian_path_in_a_diamond() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert_eq!(graph.hamiltonian_path(), None);
    }
}
