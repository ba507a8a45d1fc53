//! Single-source and all-pairs shortest paths under multiple weight regimes.
//!
//! - [`Graph::dijkstra`]: non-negative weights, lazy-invalidation heap
//! - [`Graph::bellman_ford`]: arbitrary weights, explicit negative-cycle
//!   failure
//! - [`Graph::floyd_warshall`]: all-pairs matrix
//! - [`Graph::dag_shortest_paths`] / [`Graph::dag_longest_paths`]: one
//!   relaxation pass along a topological order

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use bitvec::prelude::*;
use tracing::debug;

use crate::distance::{Distance, DistanceMap};
use crate::error::GraphError;
use crate::graph::{Graph, NodeKey};

/// All-pairs distances: the node order used for the matrix plus the matrix
/// itself.
pub struct PairwiseDistances<N: NodeKey> {
    order: Vec<N>,
    index: HashMap<N, usize>,
    matrix: Vec<Vec<Distance>>,
}

impl<N: NodeKey> PairwiseDistances<N> {
    /// Distance from `from` to `to`; `None` when either node is unknown.
    pub fn get(&self, from: &N, to: &N) -> Option<Distance> {
        Some(self.matrix[*self.index.get(from)?][*self.index.get(to)?])
    }

    pub fn node_order(&self) -> &[N] {
        &self.order
    }

    pub fn matrix(&self) -> &[Vec<Distance>] {
        &self.matrix
    }
}

impl<N: NodeKey> Graph<N> {
    /// Single-source shortest paths via Dijkstra's algorithm.
    ///
    /// Precondition (unchecked): all edge weights are non-negative; negative
    /// weights yield unspecified distances.
    ///
    /// The heap has no decrease-key, so every relaxation pushes a fresh entry
    /// and stale entries are skipped on pop by comparing against the current
    /// best distance.
    pub fn dijkstra(&self, source: &N) -> Result<DistanceMap<N>, GraphError> {
        let start = self
            .index_of(source)
            .ok_or_else(|| GraphError::UnknownNode(format!("{source:?}")))?;
        let adjacency = self.weighted_adjacency_indices();
        let mut dist: Vec<Option<i64>> = vec![None; self.num_nodes()];
        dist[start] = Some(0);
        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0i64, start)));
        while let Some(Reverse((d, node))) = heap.pop() {
            if dist[node] != Some(d) {
                // Stale entry: the node was relaxed again after this push.
                continue;
            }
            for &(next, weight) in &adjacency[node] {
                let candidate = d.saturating_add(weight);
                if dist[next].is_none_or(|current| candidate < current) {
                    dist[next] = Some(candidate);
                    heap.push(Reverse((candidate, next)));
                }
            }
        }
        Ok(self.collect_distances(&dist))
    }

    /// Single-source shortest paths via Bellman-Ford. Handles negative
    /// weights; a negative cycle reachable from `source` is reported as
    /// [`GraphError::NegativeCycle`] instead of a partial distance map.
    pub fn bellman_ford(&self, source: &N) -> Result<DistanceMap<N>, GraphError> {
        let start = self
            .index_of(source)
            .ok_or_else(|| GraphError::UnknownNode(format!("{source:?}")))?;
        let arcs = self.weighted_arcs();
        let mut dist: Vec<Option<i64>> = vec![None; self.num_nodes()];
        dist[start] = Some(0);
        for _ in 1..self.num_nodes() {
            let mut updated = false;
            for &(tail, head, weight) in &arcs {
                if let Some(from) = dist[tail] {
                    let candidate = from.saturating_add(weight);
                    if dist[head].is_none_or(|current| candidate < current) {
                        dist[head] = Some(candidate);
                        updated = true;
                    }
                }
            }
            if !updated {
                break;
            }
        }
        // Verification pass: any remaining improvement proves a negative
        // cycle reachable from the source.
        for &(tail, head, weight) in &arcs {
            if let Some(from) = dist[tail] {
                let candidate = from.saturating_add(weight);
                if dist[head].is_none_or(|current| candidate < current) {
                    debug!(?tail, ?head, weight, "edge still improvable after |V|-1 passes");
                    return Err(GraphError::NegativeCycle);
                }
            }
        }
        Ok(self.collect_distances(&dist))
    }

    /// Whether any negative-weight cycle exists anywhere in the graph,
    /// checked by launching Bellman-Ford from successive uncovered roots.
    pub fn has_negative_cycle(&self) -> bool {
        let mut covered = bitvec![0; self.num_nodes()];
        for root in 0..self.num_nodes() {
            if covered[root] {
                continue;
            }
            match self.bellman_ford(self.node_at(root)) {
                Ok(distances) => {
                    for (node, distance) in &distances {
                        if distance.is_finite() {
                            let i = self.index_of(node).expect("distance keys are graph nodes");
                            covered.set(i, true);
                        }
                    }
                }
                Err(_) => return true,
            }
        }
        false
    }

    /// All-pairs shortest distances via Floyd-Warshall.
    ///
    /// Convention: the diagonal seeds at [`Distance::Unreachable`], so
    /// `get(v, v)` is finite iff some cycle passes through `v` (a self-loop
    /// counts). Callers wanting the reflexive convention can treat the
    /// diagonal as zero themselves.
    pub fn floyd_warshall(&self) -> PairwiseDistances<N> {
        let n = self.num_nodes();
        let mut matrix = vec![vec![Distance::Unreachable; n]; n];
        for (tail, head, weight) in self.weighted_arcs() {
            matrix[tail][head] = Distance::Finite(weight);
        }
        for k in 0..n {
            for i in 0..n {
                let Distance::Finite(ik) = matrix[i][k] else {
                    continue;
                };
                for j in 0..n {
                    if let Distance::Finite(kj) = matrix[k][j] {
                        let candidate = Distance::Finite(ik.saturating_add(kj));
                        if candidate < matrix[i][j] {
                            matrix[i][j] = candidate;
                        }
                    }
                }
            }
        }
        PairwiseDistances {
            order: self.nodes().to_vec(),
            index: self
                .nodes()
                .iter()
                .enumerate()
                .map(|(i, n)| (n.clone(), i))
                .collect(),
            matrix,
        }
    }

    /// Shortest paths from `source` by a single relaxation pass along a
    /// topological order, plus the predecessor of each relaxed node.
    ///
    /// Precondition (unchecked): the graph is acyclic.
    pub fn dag_shortest_paths(
        &self,
        source: &N,
    ) -> Result<(DistanceMap<N>, HashMap<N, N>), GraphError> {
        self.dag_relaxation(source, false)
    }

    /// Longest paths from `source` by the same pass, maximizing instead of
    /// minimizing. Precondition (unchecked): the graph is acyclic.
    pub fn dag_longest_paths(
        &self,
        source: &N,
    ) -> Result<(DistanceMap<N>, HashMap<N, N>), GraphError> {
        self.dag_relaxation(source, true)
    }

    fn dag_relaxation(
        &self,
        source: &N,
        longest: bool,
    ) -> Result<(DistanceMap<N>, HashMap<N, N>), GraphError> {
        let start = self
            .index_of(source)
            .ok_or_else(|| GraphError::UnknownNode(format!("{source:?}")))?;
        let order = self.topological_indices();
        let adjacency = self.weighted_adjacency_indices();
        let mut dist: Vec<Option<i64>> = vec![None; self.num_nodes()];
        let mut pred: Vec<Option<usize>> = vec![None; self.num_nodes()];
        dist[start] = Some(0);
        for &node in &order {
            let Some(from) = dist[node] else { continue };
            for &(next, weight) in &adjacency[node] {
                let candidate = from.saturating_add(weight);
                let improves = dist[next].is_none_or(|current| {
                    if longest {
                        candidate > current
                    } else {
                        candidate < current
                    }
                });
                if improves {
                    dist[next] = Some(candidate);
                    pred[next] = Some(node);
                }
            }
        }
        let predecessors = pred
            .iter()
            .enumerate()
            .filter_map(|(node, p)| {
                p.map(|p| (self.node_at(node).clone(), self.node_at(p).clone()))
            })
            .collect();
        Ok((self.collect_distances(&dist), predecessors))
    }

    fn collect_distances(&self, dist: &[Option<i64>]) -> DistanceMap<N> {
        self.nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| {
                (
                    n.clone(),
                    dist[i].map_or(Distance::Unreachable, Distance::Finite),
                )
            })
            .collect()
    }
}

/// Walks a predecessor map back from `target` to `source`. Returns `None`
/// when `target` was never relaxed from `source`.
pub fn path_from_predecessors<N: NodeKey>(
    source: &N,
    target: &N,
    predecessors: &HashMap<N, N>,
) -> Option<Vec<N>> {
    let mut path = vec![target.clone()];
    let mut current = target.clone();
    while current != *source {
        current = predecessors.get(&current)?.clone();
        path.push(current.clone());
        if path.len() > predecessors.len() + 1 {
            return None;
        }
    }
    path.reverse();
    Some(path)
}
