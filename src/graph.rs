//! The shared graph representation consumed by every algorithm module.
//!
//! A [`Graph`] is a node list plus an edge multiset, tagged directed or
//! undirected. Undirected graphs are realized by expanding each edge into
//! both directions in the *derived views* (adjacency, degree tables); the
//! stored edge collection never holds reversed duplicates.
//!
//! This module provides:
//!
//! - [`Graph`]: the node/edge collection with its directedness tag
//! - [`Edge`]: `(tail, head, weight)` with weight defaulting to 1
//! - [`Directedness`]: the per-graph directed/undirected tag
//! - Derived adjacency, weighted-adjacency, and degree views
//!
//! Graphs are immutable once built. Every view is freshly computed per call,
//! so independent calls are reentrant and never share mutable state.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::GraphError;

/// Bound alias for node identifiers: anything hashable, comparable, and
/// cheaply clonable qualifies (integers, strings, composites).
pub trait NodeKey: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> NodeKey for T {}

/// Whether edges are traversed one way or symmetrically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Directedness {
    Directed,
    Undirected,
}

impl Directedness {
    pub fn is_directed(self) -> bool {
        matches!(self, Directedness::Directed)
    }
}

/// A weighted edge. The weight defaults to 1 so unweighted edge lists can be
/// passed as plain `(tail, head)` tuples.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge<N> {
    pub tail: N,
    pub head: N,
    pub weight: i64,
}

impl<N> Edge<N> {
    pub fn new(tail: N, head: N) -> Self {
        Edge {
            tail,
            head,
            weight: 1,
        }
    }

    pub fn weighted(tail: N, head: N, weight: i64) -> Self {
        Edge { tail, head, weight }
    }
}

impl<N> From<(N, N)> for Edge<N> {
    fn from((tail, head): (N, N)) -> Self {
        Edge::new(tail, head)
    }
}

impl<N> From<(N, N, i64)> for Edge<N> {
    fn from((tail, head, weight): (N, N, i64)) -> Self {
        Edge::weighted(tail, head, weight)
    }
}

/// A node set plus an edge multiset, tagged directed or undirected.
#[derive(Clone, Debug)]
pub struct Graph<N: NodeKey> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    edges: Vec<Edge<N>>,
    directedness: Directedness,
}

impl<N: NodeKey> Graph<N> {
    /// Builds a graph whose node set is derived as the union of edge
    /// endpoints, in sorted order.
    pub fn from_edges<I>(directedness: Directedness, edges: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Edge<N>>,
    {
        let edges: Vec<Edge<N>> = edges.into_iter().map(Into::into).collect();
        let mut nodes: Vec<N> = Vec::with_capacity(edges.len() * 2);
        for edge in &edges {
            nodes.push(edge.tail.clone());
            nodes.push(edge.head.clone());
        }
        nodes.sort();
        nodes.dedup();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Graph {
            nodes,
            index,
            edges,
            directedness,
        }
    }

    /// Builds a graph over an explicitly supplied node set, preserving its
    /// order. Fails with [`GraphError::UnknownEndpoint`] if any edge endpoint
    /// is missing from the set; isolated nodes are fine.
    pub fn with_nodes<I>(
        directedness: Directedness,
        nodes: Vec<N>,
        edges: I,
    ) -> Result<Self, GraphError>
    where
        I: IntoIterator,
        I::Item: Into<Edge<N>>,
    {
        let index: HashMap<N, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        let edges: Vec<Edge<N>> = edges.into_iter().map(Into::into).collect();
        for edge in &edges {
            for end in [&edge.tail, &edge.head] {
                if !index.contains_key(end) {
                    return Err(GraphError::UnknownEndpoint(format!("{end:?}")));
                }
            }
        }
        Ok(Graph {
            nodes,
            index,
            edges,
            directedness,
        })
    }

    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Returns the same graph with every edge reversed. Node order is kept.
    pub fn transposed(&self) -> Graph<N> {
        Graph {
            nodes: self.nodes.clone(),
            index: self.index.clone(),
            edges: self
                .edges
                .iter()
                .map(|e| Edge::weighted(e.head.clone(), e.tail.clone(), e.weight))
                .collect(),
            directedness: self.directedness,
        }
    }

    /// Node → ordered successor list, pre-populated over the whole node set.
    /// Undirected edges appear in both directions.
    pub fn adjacency(&self) -> HashMap<N, Vec<N>> {
        let mut adjacency: HashMap<N, Vec<N>> =
            self.nodes.iter().map(|n| (n.clone(), Vec::new())).collect();
        for edge in &self.edges {
            adjacency
                .get_mut(&edge.tail)
                .expect("edge endpoints are in the node set")
                .push(edge.head.clone());
            if !self.directedness.is_directed() {
                adjacency
                    .get_mut(&edge.head)
                    .expect("edge endpoints are in the node set")
                    .push(edge.tail.clone());
            }
        }
        adjacency
    }

    /// Node → successor → weight. For parallel edges the last one wins, the
    /// same way repeated assignments behave in a flat edge-table build.
    pub fn weighted_adjacency(&self) -> HashMap<N, HashMap<N, i64>> {
        let mut adjacency: HashMap<N, HashMap<N, i64>> = self
            .nodes
            .iter()
            .map(|n| (n.clone(), HashMap::new()))
            .collect();
        for edge in &self.edges {
            adjacency
                .get_mut(&edge.tail)
                .expect("edge endpoints are in the node set")
                .insert(edge.head.clone(), edge.weight);
            if !self.directedness.is_directed() {
                adjacency
                    .get_mut(&edge.head)
                    .expect("edge endpoints are in the node set")
                    .insert(edge.tail.clone(), edge.weight);
            }
        }
        adjacency
    }

    /// In-degree of every node, pre-populated so absent entries never fall
    /// back to an implicit zero. Undirected graphs count both endpoints.
    pub fn in_degrees(&self) -> HashMap<N, usize> {
        let mut degrees: HashMap<N, usize> = self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for edge in &self.edges {
            *degrees.get_mut(&edge.head).expect("endpoint in node set") += 1;
            if !self.directedness.is_directed() {
                *degrees.get_mut(&edge.tail).expect("endpoint in node set") += 1;
            }
        }
        degrees
    }

    /// Out-degree of every node. For undirected graphs this equals
    /// [`Graph::in_degrees`].
    pub fn out_degrees(&self) -> HashMap<N, usize> {
        let mut degrees: HashMap<N, usize> = self.nodes.iter().map(|n| (n.clone(), 0)).collect();
        for edge in &self.edges {
            *degrees.get_mut(&edge.tail).expect("endpoint in node set") += 1;
            if !self.directedness.is_directed() {
                *degrees.get_mut(&edge.head).expect("endpoint in node set") += 1;
            }
        }
        degrees
    }

    // ------------------------------------------------------------------
    // Dense-index views shared by the algorithm modules. Index order is the
    // graph's node order.
    // ------------------------------------------------------------------

    pub(crate) fn index_of(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    pub(crate) fn node_at(&self, index: usize) -> &N {
        &self.nodes[index]
    }

    /// Successor lists over node indices, honoring the directedness tag.
    pub(crate) fn adjacency_indices(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            let (t, h) = self.endpoint_indices(edge);
            adjacency[t].push(h);
            if !self.directedness.is_directed() {
                adjacency[h].push(t);
            }
        }
        adjacency
    }

    /// Successor lists over node indices, always reading edges tail → head.
    /// Used by the algorithms whose semantics are inherently directed
    /// (acyclicity, topological order, SCC, Eulerian degrees).
    pub(crate) fn out_adjacency_indices(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            let (t, h) = self.endpoint_indices(edge);
            adjacency[t].push(h);
        }
        adjacency
    }

    /// Weighted successor lists over node indices, honoring the tag.
    pub(crate) fn weighted_adjacency_indices(&self) -> Vec<Vec<(usize, i64)>> {
        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            let (t, h) = self.endpoint_indices(edge);
            adjacency[t].push((h, edge.weight));
            if !self.directedness.is_directed() {
                adjacency[h].push((t, edge.weight));
            }
        }
        adjacency
    }

    /// Flat `(tail, head, weight)` triples over node indices, honoring the
    /// tag: undirected edges contribute both orientations.
    pub(crate) fn weighted_arcs(&self) -> Vec<(usize, usize, i64)> {
        let mut arcs = Vec::with_capacity(self.edges.len());
        for edge in &self.edges {
            let (t, h) = self.endpoint_indices(edge);
            arcs.push((t, h, edge.weight));
            if !self.directedness.is_directed() {
                arcs.push((h, t, edge.weight));
            }
        }
        arcs
    }

    fn endpoint_indices(&self, edge: &Edge<N>) -> (usize, usize) {
        (self.index[&edge.tail], self.index[&edge.head])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_sorted_node_set() {
        let graph = Graph::from_edges(Directedness::Directed, [(3, 1), (1, 2), (2, 3)]);
        assert_eq!(graph.nodes(), &[1, 2, 3]);
        assert_eq!(graph.num_edges(), 3);
    }

    #[test]
    fn explicit_nodes_keep_order_and_allow_isolated() {
        let graph = Graph::with_nodes(Directedness::Directed, vec![9, 4, 7], [(9, 4)]).unwrap();
        assert_eq!(graph.nodes(), &[9, 4, 7]);
        assert!(graph.contains_node(&7));
    }

    #[test]
    fn rejects_edge_outside_node_set() {
        let err = Graph::with_nodes(Directedness::Directed, vec![1, 2], [(1, 3)]).unwrap_err();
        assert_eq!(err, GraphError::UnknownEndpoint("3".to_string()));
    }

    #[test]
    fn undirected_adjacency_is_symmetric_without_duplicate_storage() {
        let graph = Graph::from_edges(Directedness::Undirected, [(1, 2), (2, 3)]);
        assert_eq!(graph.num_edges(), 2);
        let adjacency = graph.adjacency();
        assert_eq!(adjacency[&2], vec![1, 3]);
        assert_eq!(adjacency[&1], vec![2]);
        assert_eq!(adjacency[&3], vec![2]);
    }

    #[test]
    fn degree_tables_cover_every_node() {
        let graph = Graph::with_nodes(
            Directedness::Directed,
            vec![1, 2, 3, 4],
            [(1, 2), (2, 3), (1, 3)],
        )
        .unwrap();
        let ins = graph.in_degrees();
        let outs = graph.out_degrees();
        assert_eq!(ins[&3], 2);
        assert_eq!(ins[&4], 0);
        assert_eq!(outs[&1], 2);
        assert_eq!(outs[&4], 0);
    }

    #[test]
    fn undirected_degrees_count_both_endpoints() {
        let graph = Graph::from_edges(Directedness::Undirected, [(1, 2), (2, 3)]);
        assert_eq!(graph.in_degrees()[&2], 2);
        assert_eq!(graph.in_degrees(), graph.out_degrees());
    }

    #[test]
    fn weighted_adjacency_last_parallel_edge_wins() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2, 5), (1, 2, 9)]);
        assert_eq!(graph.weighted_adjacency()[&1][&2], 9);
    }

    #[test]
    fn transposed_reverses_edges() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 2), (2, 3)]);
        let transposed = graph.transposed();
        assert_eq!(transposed.adjacency()[&2], vec![1]);
        assert_eq!(transposed.nodes(), graph.nodes());
    }

    #[test]
    fn self_loops_are_permitted() {
        let graph = Graph::from_edges(Directedness::Directed, [(1, 1), (1, 2)]);
        assert_eq!(graph.adjacency()[&1], vec![1, 2]);
        assert_eq!(graph.in_degrees()[&1], 1);
    }
}
