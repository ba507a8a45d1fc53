//! Eulerian trails and non-branching path decomposition.
//!
//! Everything here treats edges as directed (de Bruijn graphs are) and works
//! on a call-private, consumable copy of the edge multiset: the caller's
//! graph is never mutated, and nothing escapes the call.
//!
//! This module provides:
//!
//! - [`Graph::eulerian_cycle`]: Hierholzer stack walk from a chosen start
//! - [`Graph::eulerian_path`]: endpoint detection by degree imbalance, then
//!   the cycle walk
//! - [`Graph::paired_eulerian_path`]: the gapped-read variant with a
//!   window-consistency pruning predicate
//! - [`Graph::maximal_non_branching_paths`]: contig decomposition

use std::collections::{BTreeMap, HashMap, VecDeque};

use bitvec::prelude::*;
use tracing::debug;

use crate::error::GraphError;
use crate::graph::{Graph, NodeKey};

/// Node type of a paired (gapped) de Bruijn graph: the two reads of a pair.
pub type ReadPair = (String, String);

/// Abandon a paired-path search after this many extension/backtrack steps.
/// The search is exponential in the worst case; well-formed read sets finish
/// far below this.
const PAIRED_STEP_BUDGET: usize = 4_000_000;

/// A consumable copy of a graph's edge multiset, keyed by tail. Edges are
/// handed out in insertion order per tail and never given out twice.
struct EdgePool<N: NodeKey> {
    adjacency: BTreeMap<N, VecDeque<N>>,
    remaining: usize,
}

impl<N: NodeKey> EdgePool<N> {
    fn new(graph: &Graph<N>) -> Self {
        let mut adjacency: BTreeMap<N, VecDeque<N>> = BTreeMap::new();
        for edge in graph.edges() {
            adjacency
                .entry(edge.tail.clone())
                .or_default()
                .push_back(edge.head.clone());
        }
        EdgePool {
            adjacency,
            remaining: graph.num_edges(),
        }
    }

    /// Consumes and returns the next unused edge out of `node`, if any.
    fn take_next(&mut self, node: &N) -> Option<N> {
        let head = self.adjacency.get_mut(node)?.pop_front()?;
        self.remaining -= 1;
        Some(head)
    }

    /// Some node that still has an unused outgoing edge.
    fn active_tail(&self) -> Option<N> {
        self.adjacency
            .iter()
            .find(|(_, heads)| !heads.is_empty())
            .map(|(node, _)| node.clone())
    }

    fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}

impl<N: NodeKey> Graph<N> {
    /// Walks an Eulerian cycle from `start`: the trail is extended by any
    /// unused outgoing edge from the top of a path stack, and stuck nodes
    /// are popped into the output.
    ///
    /// Precondition (unchecked): every node has equal in- and out-degree and
    /// the edge set is connected; otherwise the returned trail is incomplete
    /// and covers only part of the edge multiset.
    pub fn eulerian_cycle(&self, start: &N) -> Vec<N> {
        let mut pool = EdgePool::new(self);
        let mut trail = self.drain_trail(&mut pool, start.clone());
        trail.reverse();
        trail
    }

    fn drain_trail(&self, pool: &mut EdgePool<N>, start: N) -> Vec<N> {
        let mut stack = vec![start];
        let mut trail = Vec::with_capacity(self.num_edges() + 1);
        while let Some(top) = stack.last().cloned() {
            match pool.take_next(&top) {
                Some(next) => stack.push(next),
                None => trail.push(stack.pop().expect("stack holds the inspected node")),
            }
        }
        trail
    }

    /// Finds the unique start (out − in = +1) and end (in − out = +1) of an
    /// Eulerian path and walks it. Without exactly one such pair the edge
    /// set admits no Eulerian path and [`GraphError::NoEulerianPath`] is
    /// returned — a perfectly balanced graph has Eulerian cycles, not an
    /// Eulerian path in this sense.
    pub fn eulerian_path(&self) -> Result<Vec<N>, GraphError> {
        let start = self.eulerian_start()?;
        Ok(self.eulerian_cycle(&start))
    }

    fn eulerian_start(&self) -> Result<N, GraphError> {
        let (ins, outs) = self.directed_degrees();
        let starts: Vec<&N> = self
            .nodes()
            .iter()
            .filter(|n| outs[*n] - ins[*n] == 1)
            .collect();
        let ends: Vec<&N> = self
            .nodes()
            .iter()
            .filter(|n| ins[*n] - outs[*n] == 1)
            .collect();
        if let ([start], [_]) = (starts.as_slice(), ends.as_slice()) {
            Ok((*start).clone())
        } else {
            debug!(
                starts = starts.len(),
                ends = ends.len(),
                "degree imbalance does not single out an Eulerian start/end pair"
            );
            Err(GraphError::NoEulerianPath)
        }
    }

    /// Directed in/out degree tables regardless of the graph's tag, covering
    /// every node.
    fn directed_degrees(&self) -> (HashMap<N, i64>, HashMap<N, i64>) {
        let mut ins: HashMap<N, i64> = self.nodes().iter().map(|n| (n.clone(), 0)).collect();
        let mut outs = ins.clone();
        for edge in self.edges() {
            *ins.get_mut(&edge.head).expect("endpoint in node set") += 1;
            *outs.get_mut(&edge.tail).expect("endpoint in node set") += 1;
        }
        (ins, outs)
    }

    /// Decomposes the edge multiset into maximal non-branching paths.
    ///
    /// Nodes with in-degree = out-degree = 1 are pass-through; from every
    /// other node, each outgoing edge is followed through consecutive
    /// pass-through nodes until a branching node stops the path. Edges left
    /// over afterwards lie entirely among pass-through nodes and form
    /// isolated cycles, which are emitted as closed trails.
    pub fn maximal_non_branching_paths(&self) -> Vec<Vec<N>> {
        let (ins, outs) = self.directed_degrees();
        let pass_through = |n: &N| ins[n] == 1 && outs[n] == 1;
        let mut pool = EdgePool::new(self);
        let mut paths = Vec::new();

        for node in self.nodes() {
            if pass_through(node) {
                continue;
            }
            while let Some(first) = pool.take_next(node) {
                let mut path = vec![node.clone(), first.clone()];
                let mut current = first;
                while pass_through(&current) {
                    match pool.take_next(&current) {
                        Some(next) => {
                            path.push(next.clone());
                            current = next;
                        }
                        None => break,
                    }
                }
                paths.push(path);
            }
        }

        while let Some(start) = pool.active_tail() {
            let mut cycle = vec![start.clone()];
            let mut current = start;
            while let Some(next) = pool.take_next(&current) {
                cycle.push(next.clone());
                current = next;
            }
            paths.push(cycle);
        }
        debug_assert!(pool.is_empty());
        paths
    }
}

impl Graph<ReadPair> {
    /// Eulerian path over a paired de Bruijn graph built from `(k, d)`-mer
    /// read pairs.
    ///
    /// The trail is grown by depth-first extension with backtracking; a
    /// candidate node is admissible only while the trail is shorter than
    /// `k + d`, or when its first read ends with the same symbol as the
    /// second read of the pair `k + d` positions back. Succeeds when every
    /// edge has been used exactly once.
    pub fn paired_eulerian_path(&self, k: usize, d: usize) -> Result<Vec<ReadPair>, GraphError> {
        let start = self.eulerian_start()?;
        let start = self.index_of(&start).expect("endpoint comes from the node set");
        let window = k + d;

        let mut out_edges: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.num_nodes()];
        for (id, edge) in self.edges().iter().enumerate() {
            let tail = self.index_of(&edge.tail).expect("endpoint in node set");
            let head = self.index_of(&edge.head).expect("endpoint in node set");
            out_edges[tail].push((head, id));
        }

        struct Frame {
            cursor: usize,
            via: Option<usize>,
        }

        let total = self.num_edges();
        let mut used = bitvec![0; total];
        let mut used_count = 0;
        let mut path = vec![start];
        let mut frames = vec![Frame {
            cursor: 0,
            via: None,
        }];
        let mut steps = 0usize;

        loop {
            if used_count == total {
                return Ok(path.iter().map(|&i| self.node_at(i).clone()).collect());
            }
            steps += 1;
            if steps > PAIRED_STEP_BUDGET {
                debug!(steps, "paired-path search ran out of budget");
                return Err(GraphError::BudgetExhausted);
            }

            let node = *path.last().expect("trail starts at the Eulerian start");
            let mut chosen = None;
            {
                let frame = frames.last_mut().expect("one frame per trail node");
                while frame.cursor < out_edges[node].len() {
                    let (head, id) = out_edges[node][frame.cursor];
                    frame.cursor += 1;
                    if !used[id] && self.window_consistent(&path, head, window) {
                        chosen = Some((head, id));
                        break;
                    }
                }
            }
            match chosen {
                Some((head, id)) => {
                    used.set(id, true);
                    used_count += 1;
                    path.push(head);
                    frames.push(Frame {
                        cursor: 0,
                        via: Some(id),
                    });
                }
                None => {
                    let frame = frames.pop().expect("one frame per trail node");
                    match frame.via {
                        Some(id) => {
                            used.set(id, false);
                            used_count -= 1;
                            path.pop();
                        }
                        // The start frame has no admissible extension left.
                        None => return Err(GraphError::NoEulerianPath),
                    }
                }
            }
        }
    }

    /// The paired-read distance constraint: the candidate's first read must
    /// end with the same symbol the second read of the pair `window`
    /// positions back ends with.
    fn window_consistent(&self, path: &[usize], candidate: usize, window: usize) -> bool {
        if path.len() < window {
            return true;
        }
        let (first, _) = self.node_at(candidate);
        let (_, second) = self.node_at(path[path.len() - window]);
        first.as_bytes().last() == second.as_bytes().last()
    }
}
