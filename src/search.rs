use std::collections::{HashMap, VecDeque};

use bitvec::prelude::*;

use crate::error::GraphError;
use crate::graph::{Graph, NodeKey};

/// Level-order traversal yielding `(node, hop count)` pairs.
pub struct BfsIterator<'g, N: NodeKey> {
    graph: &'g Graph<N>,
    adjacency: Vec<Vec<usize>>,
    visited: BitVec,
    queue: VecDeque<(usize, i64)>,
}

impl<'g, N: NodeKey> BfsIterator<'g, N> {
    pub(crate) fn new(graph: &'g Graph<N>, start: usize) -> Self {
        let mut visited = bitvec![0; graph.num_nodes()];
        visited.set(start, true);
        Self {
            graph,
            adjacency: graph.adjacency_indices(),
            visited,
            queue: VecDeque::from([(start, 0)]),
        }
    }
}

impl<'g, N: NodeKey> Iterator for BfsIterator<'g, N> {
    type Item = (&'g N, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, hops) = self.queue.pop_front()?;
        for &next in &self.adjacency[node] {
            if !self.visited[next] {
                self.visited.set(next, true);
                self.queue.push_back((next, hops + 1));
            }
        }
        Some((self.graph.node_at(node), hops))
    }
}

/// Iterative DFS producing finish order: a node is appended only after every
/// descendant has been fully explored. Shared by topological sort, Kosaraju,
/// and component discovery.
pub(crate) fn finish_order_into(
    adjacency: &[Vec<usize>],
    visited: &mut BitSlice,
    root: usize,
    order: &mut Vec<usize>,
) {
    if visited[root] {
        return;
    }
    visited.set(root, true);
    let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
    while let Some(&mut (node, ref mut child)) = stack.last_mut() {
        if *child < adjacency[node].len() {
            let next = adjacency[node][*child];
            *child += 1;
            if !visited[next] {
                visited.set(next, true);
                stack.push((next, 0));
            }
        } else {
            stack.pop();
            order.push(node);
        }
    }
}

impl<N: NodeKey> Graph<N> {
    /// Hop counts from `source` to every node, with `-1` marking nodes the
    /// traversal never reaches.
    pub fn bfs_distances(&self, source: &N) -> Result<HashMap<N, i64>, GraphError> {
        let start = self
            .index_of(source)
            .ok_or_else(|| GraphError::UnknownNode(format!("{source:?}")))?;
        let mut distances: HashMap<N, i64> =
            self.nodes().iter().map(|n| (n.clone(), -1)).collect();
        for (node, hops) in BfsIterator::new(self, start) {
            distances.insert(node.clone(), hops);
        }
        Ok(distances)
    }

    /// Breadth-first traversal from `source`, yielding each reached node with
    /// its hop count.
    pub fn bfs(&self, source: &N) -> Result<BfsIterator<'_, N>, GraphError> {
        let start = self
            .index_of(source)
            .ok_or_else(|| GraphError::UnknownNode(format!("{source:?}")))?;
        Ok(BfsIterator::new(self, start))
    }

    /// Nodes reachable from `source` in DFS finish order.
    pub fn dfs_finish_order(&self, source: &N) -> Result<Vec<N>, GraphError> {
        let root = self
            .index_of(source)
            .ok_or_else(|| GraphError::UnknownNode(format!("{source:?}")))?;
        let adjacency = self.adjacency_indices();
        let mut visited = bitvec![0; self.num_nodes()];
        let mut order = Vec::new();
        finish_order_into(&adjacency, &mut visited, root, &mut order);
        Ok(order.into_iter().map(|i| self.node_at(i).clone()).collect())
    }

    /// Partitions the node set into reachability components by launching DFS
    /// from each not-yet-covered node. For undirected graphs these are the
    /// connected components; for directed graphs, reachable sets in launch
    /// order.
    pub fn connected_components(&self) -> Vec<Vec<N>> {
        let adjacency = self.adjacency_indices();
        let mut visited = bitvec![0; self.num_nodes()];
        let mut components = Vec::new();
        for root in 0..self.num_nodes() {
            if !visited[root] {
                let mut order = Vec::new();
                finish_order_into(&adjacency, &mut visited, root, &mut order);
                components.push(order.into_iter().map(|i| self.node_at(i).clone()).collect());
            }
        }
        components
    }

    /// Two-colors the component containing `source` by BFS. Returns `false`
    /// the instant an edge connects two same-colored nodes; nodes the
    /// traversal never reaches are not examined.
    pub fn is_bipartite_from(&self, source: &N) -> Result<bool, GraphError> {
        let start = self
            .index_of(source)
            .ok_or_else(|| GraphError::UnknownNode(format!("{source:?}")))?;
        let adjacency = self.adjacency_indices();
        let mut color: Vec<i8> = vec![-1; self.num_nodes()];
        color[start] = 1;
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for &next in &adjacency[node] {
                if color[next] == -1 {
                    color[next] = 1 - color[node];
                    queue.push_back(next);
                } else if color[next] == color[node] {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Directedness;

    fn path_graph() -> Graph<i32> {
        Graph::with_nodes(Directedness::Directed, vec![1, 2, 3, 4], [(1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn bfs_hop_counts_with_sentinel() {
        let distances = path_graph().bfs_distances(&1).unwrap();
        assert_eq!(distances[&1], 0);
        assert_eq!(distances[&2], 1);
        assert_eq!(distances[&3], 2);
        assert_eq!(distances[&4], -1);
    }

    #[test]
    fn bfs_unknown_source_is_rejected() {
        assert_eq!(
            path_graph().bfs_distances(&9).unwrap_err(),
            GraphError::UnknownNode("9".to_string())
        );
    }

    #[test]
    fn bfs_respects_undirected_edges() {
        let graph = Graph::from_edges(Directedness::Undirected, [(1, 2), (2, 3)]);
        let distances = graph.bfs_distances(&3).unwrap();
        assert_eq!(distances[&1], 2);
    }

    #[test]
    fn dfs_finish_order_appends_after_descendants() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 3), (1, 4)]);
        let order = graph.dfs_finish_order(&1).unwrap();
        // 1 finishes last; every node finishes after all its descendants.
        assert_eq!(order.last(), Some(&1));
        let pos = |n: i32| order.iter().position(|&x| x == n).unwrap();
        assert!(pos(3) < pos(2));
        assert!(pos(2) < pos(1));
        assert!(pos(4) < pos(1));
    }

    #[test]
    fn dfs_handles_cycles() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 3), (3, 1)]);
        let order = graph.dfs_finish_order(&1).unwrap();
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn components_cover_every_node_once() {
        let graph = Graph::with_nodes(
            Directedness::Undirected,
            vec![1, 2, 3, 4, 5],
            [(1, 2), (3, 4)],
        )
        .unwrap();
        let components = graph.connected_components();
        assert_eq!(components.len(), 3);
        let mut all: Vec<i32> = components.into_iter().flatten().collect();
        all.sort();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn even_cycle_is_bipartite_odd_is_not() {
        let even = Graph::from_edges(Directedness::Undirected, [(1, 2), (2, 3), (3, 4), (4, 1)]);
        assert!(even.is_bipartite_from(&1).unwrap());
        let odd = Graph::from_edges(Directedness::Undirected, [(1, 2), (2, 3), (3, 1)]);
        assert!(!odd.is_bipartite_from(&1).unwrap());
    }

    #[test]
    fn bipartite_only_examines_reachable_component() {
        // Odd cycle 4-5-6 is disconnected from the source's component.
        let graph = Graph::from_edges(
            Directedness::Undirected,
            [(1, 2), (4, 5), (5, 6), (6, 4)],
        );
        assert!(graph.is_bipartite_from(&1).unwrap());
        assert!(!graph.is_bipartite_from(&4).unwrap());
    }
}
