//! Strongly connected components and condensation-graph queries.
//!
//! Two independent SCC discoveries are provided: Tarjan (single DFS pass,
//! lowlink-based) and Kosaraju (finish order + transposed DFS). Both emit the
//! same partition; Tarjan's emission order additionally follows reverse
//! topological order of the condensation, which the 2-SAT solver depends on.

use std::collections::BTreeSet;

use bitvec::prelude::*;
use tracing::trace;

use crate::graph::{Directedness, Graph, NodeKey};
use crate::search::finish_order_into;

/// All components of a graph, covering every node exactly once, in the order
/// the algorithm emitted them.
pub type Partition<N> = Vec<Vec<N>>;

const UNDISCOVERED: usize = usize::MAX;

impl<N: NodeKey> Graph<N> {
    /// Strongly connected components by Tarjan's algorithm: one iterative
    /// DFS pass tracking discovery index and lowlink per node. A node whose
    /// lowlink equals its own index roots a component, which is popped from
    /// the active stack down to and including that node.
    pub fn tarjan(&self) -> Partition<N> {
        let adjacency = self.out_adjacency_indices();
        let n = self.num_nodes();
        let mut index = vec![UNDISCOVERED; n];
        let mut lowlink = vec![0usize; n];
        let mut on_stack = bitvec![0; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut counter = 0usize;
        let mut components = Vec::new();

        for root in 0..n {
            if index[root] != UNDISCOVERED {
                continue;
            }
            let mut frames: Vec<(usize, usize)> = Vec::new();
            let mut discover = |node: usize,
                                index: &mut Vec<usize>,
                                lowlink: &mut Vec<usize>,
                                stack: &mut Vec<usize>,
                                on_stack: &mut BitVec| {
                index[node] = counter;
                lowlink[node] = counter;
                counter += 1;
                stack.push(node);
                on_stack.set(node, true);
            };
            discover(root, &mut index, &mut lowlink, &mut stack, &mut on_stack);
            frames.push((root, 0));
            while let Some(&mut (node, ref mut child)) = frames.last_mut() {
                if *child < adjacency[node].len() {
                    let next = adjacency[node][*child];
                    *child += 1;
                    if index[next] == UNDISCOVERED {
                        discover(next, &mut index, &mut lowlink, &mut stack, &mut on_stack);
                        frames.push((next, 0));
                    } else if on_stack[next] {
                        lowlink[node] = lowlink[node].min(index[next]);
                    }
                } else {
                    frames.pop();
                    if let Some(&mut (parent, _)) = frames.last_mut() {
                        lowlink[parent] = lowlink[parent].min(lowlink[node]);
                    }
                    if lowlink[node] == index[node] {
                        let mut component = Vec::new();
                        loop {
                            let popped = stack.pop().expect("component root is on the stack");
                            on_stack.set(popped, false);
                            component.push(self.node_at(popped).clone());
                            if popped == node {
                                break;
                            }
                        }
                        components.push(component);
                    }
                }
            }
        }
        trace!(components = components.len(), "tarjan pass complete");
        components
    }

    /// Strongly connected components by Kosaraju's algorithm: DFS finish
    /// order on the graph, then DFS on the transpose processed in reverse
    /// finish order; each transposed DFS tree is one component.
    pub fn kosaraju(&self) -> Partition<N> {
        let adjacency = self.out_adjacency_indices();
        let transposed = self.transposed().out_adjacency_indices();
        let n = self.num_nodes();

        let mut visited = bitvec![0; n];
        let mut finish_order = Vec::with_capacity(n);
        for root in 0..n {
            finish_order_into(&adjacency, &mut visited, root, &mut finish_order);
        }

        let mut visited = bitvec![0; n];
        let mut components = Vec::new();
        for &root in finish_order.iter().rev() {
            if !visited[root] {
                let mut component = Vec::new();
                finish_order_into(&transposed, &mut visited, root, &mut component);
                components.push(
                    component
                        .into_iter()
                        .map(|i| self.node_at(i).clone())
                        .collect(),
                );
            }
        }
        components
    }

    /// Contracts each component of `partition` to a single node, giving the
    /// condensation DAG over component indices (in partition order).
    /// Inter-component edges are deduplicated.
    pub fn condensation(&self, partition: &Partition<N>) -> Graph<usize> {
        let mut component_of = vec![0usize; self.num_nodes()];
        for (c, component) in partition.iter().enumerate() {
            for node in component {
                let i = self
                    .index_of(node)
                    .expect("partition nodes come from this graph");
                component_of[i] = c;
            }
        }
        let mut arcs: BTreeSet<(usize, usize)> = BTreeSet::new();
        for edge in self.edges() {
            let tail = component_of[self.index_of(&edge.tail).expect("endpoint in node set")];
            let head = component_of[self.index_of(&edge.head).expect("endpoint in node set")];
            if tail != head {
                arcs.insert((tail, head));
            }
        }
        Graph::with_nodes(
            Directedness::Directed,
            (0..partition.len()).collect(),
            arcs,
        )
        .expect("contracted endpoints are component indices")
    }

    /// True iff for every node pair (u, v) at least one of the two reaches
    /// the other: the condensation's topological order must form an unbroken
    /// chain of direct edges.
    pub fn is_semi_connected(&self) -> bool {
        let condensation = self.condensation(&self.tarjan());
        let order = condensation.topological_sort();
        let arcs: BTreeSet<(usize, usize)> = condensation
            .edges()
            .iter()
            .map(|e| (e.tail, e.head))
            .collect();
        order.windows(2).all(|pair| arcs.contains(&(pair[0], pair[1])))
    }

    /// Heuristic mother-vertex check: take the first node of a topological
    /// order and verify by BFS that it reaches everything.
    ///
    /// Valid only when a genuine global sink of the condensation exists and
    /// is unique; graphs without one correctly report `None`, but the
    /// heuristic is not a substitute for a full condensation out-degree
    /// analysis.
    pub fn general_sink(&self) -> Option<N> {
        let order = self.topological_indices();
        let first = self.node_at(*order.first()?).clone();
        let distances = self
            .bfs_distances(&first)
            .expect("topological order yields graph nodes");
        if distances.values().any(|&d| d == -1) {
            None
        } else {
            Some(first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn as_sets<N: NodeKey>(partition: Partition<N>) -> BTreeSet<BTreeSet<N>> {
        partition
            .into_iter()
            .map(|c| c.into_iter().collect())
            .collect()
    }

    fn two_cycles() -> Graph<i32> {
        // Components {1,2,3}, {4,5}, {6}; arrows flow left to right.
        Graph::from_edges(
            Directedness::Directed,
            [(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 4), (5, 6)],
        )
    }

    #[test]
    fn tarjan_finds_the_component_partition() {
        let partition = two_cycles().tarjan();
        assert_eq!(
            as_sets(partition),
            BTreeSet::from([
                BTreeSet::from([1, 2, 3]),
                BTreeSet::from([4, 5]),
                BTreeSet::from([6]),
            ])
        );
    }

    #[test]
    fn tarjan_emits_in_reverse_topological_order() {
        // Sink-most component must be emitted first.
        let partition = two_cycles().tarjan();
        assert_eq!(partition[0], vec![6]);
        assert!(partition[1].contains(&4));
        assert!(partition[2].contains(&1));
    }

    #[test]
    fn kosaraju_agrees_with_tarjan() {
        let graph = two_cycles();
        assert_eq!(as_sets(graph.tarjan()), as_sets(graph.kosaraju()));
    }

    #[test]
    fn singleton_nodes_are_their_own_components() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 3)]);
        assert_eq!(graph.tarjan().len(), 3);
    }

    #[test]
    fn condensation_is_an_acyclic_contraction() {
        let graph = two_cycles();
        let partition = graph.tarjan();
        let condensation = graph.condensation(&partition);
        assert_eq!(condensation.num_nodes(), 3);
        assert!(condensation.is_acyclic());
        assert_eq!(condensation.num_edges(), 2);
    }

    #[test]
    fn chain_of_components_is_semi_connected() {
        assert!(two_cycles().is_semi_connected());
    }

    #[test]
    fn forked_components_are_not_semi_connected() {
        // 2 and 3 cannot reach each other.
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (1, 3)]);
        assert!(!graph.is_semi_connected());
    }

    #[test]
    fn general_sink_found_on_a_rooted_dag() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (1, 3), (2, 4), (3, 4)]);
        assert_eq!(graph.general_sink(), Some(1));
    }

    #[test]
    fn no_general_sink_when_sources_compete() {
        // Neither 1 nor 3 reaches the other.
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (3, 2)]);
        assert_eq!(graph.general_sink(), None);
    }

    #[test]
    fn general_sink_within_a_cycle_is_reported() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 1), (2, 3)]);
        assert!(graph.general_sink().is_some());
    }
}
