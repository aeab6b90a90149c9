//! Single-source best-path trees.
//!
//! One Dijkstra run computes, for every reachable vertex, the edge that
//! should be used to reach it optimally from the start. The full tree is
//! always built; callers reconstruct individual paths by walking it
//! backwards. The same builder is the kernel of the K-shortest-paths search,
//! which layers temporary edge suppressions on top of the live costs through
//! a [`CostOverlay`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::graph::NetworkGraph;
use crate::{Gfid, Path};

/// The output of one tree build: each reachable vertex mapped to the edge
/// used to reach it, with the start vertex mapped to `None`.
pub type PathTree = BTreeMap<Gfid, Option<Gfid>>;

/// Temporary per-edge cost overrides layered over the live edge costs.
///
/// The K-shortest-paths search needs to price routes with selected edges
/// forced to infinity. Instead of mutating the shared cost table and
/// restoring it afterwards, the overrides live in this overlay, which the
/// tree builder consults before falling back to the edge's own cost; dropping
/// the overlay restores nothing because nothing was changed.
#[derive(Debug, Clone, Default)]
pub struct CostOverlay(BTreeMap<Gfid, f64>);

impl CostOverlay {
    /// Creates an empty overlay; every edge keeps its own cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the cost of `edge` to infinity in both directions, making it
    /// unusable without removing it.
    pub fn suppress(&mut self, edge: Gfid) {
        self.0.insert(edge, f64::INFINITY);
    }

    /// The overridden cost of `edge`, if any.
    #[inline]
    pub fn cost(&self, edge: Gfid) -> Option<f64> {
        self.0.get(&edge).copied()
    }
}

/// Frontier entry ordered by ascending tentative distance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    cost: f64,
    vertex: Gfid,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted so the std max-heap pops the cheapest entry first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl NetworkGraph {
    /// Builds the best-path tree from `start` over the live edges with
    /// `overlay` applied.
    ///
    /// Blocked edges, blocked vertices and already-settled vertices are never
    /// relaxed into. Traversing an edge out of its source endpoint charges the
    /// forward cost, out of its target endpoint the inverse cost. Returns an
    /// empty tree when `start` is not a vertex of the graph.
    pub fn shortest_path_tree(&self, start: Gfid, overlay: &CostOverlay) -> PathTree {
        let mut tree = PathTree::new();
        if !self.has_vertex(start) {
            return tree;
        }

        let mut distance: BTreeMap<Gfid, f64> = BTreeMap::new();
        let mut settled: BTreeSet<Gfid> = BTreeSet::new();
        let mut frontier: BinaryHeap<Candidate> = BinaryHeap::new();

        tree.insert(start, None);
        distance.insert(start, 0.0);
        frontier.push(Candidate {
            cost: 0.0,
            vertex: start,
        });

        while let Some(current) = frontier.pop() {
            if !settled.insert(current.vertex) {
                continue;
            }

            for &edge_id in self.outgoing_edges(current.vertex) {
                let edge = match self.edge(edge_id) {
                    Some(edge) => edge,
                    None => continue,
                };
                if edge.is_blocked() {
                    continue;
                }

                let opposite = match self.opposite_vertex(edge_id, current.vertex) {
                    Some(vertex) => vertex,
                    None => continue,
                };
                if settled.contains(&opposite) {
                    continue;
                }
                match self.vertex(opposite) {
                    Some(vertex) if !vertex.is_blocked() => {}
                    _ => continue,
                }

                let step = overlay
                    .cost(edge_id)
                    .unwrap_or_else(|| edge.cost_from(current.vertex));
                let candidate = current.cost + step;

                if candidate < distance.get(&opposite).copied().unwrap_or(f64::INFINITY) {
                    distance.insert(opposite, candidate);
                    tree.insert(opposite, Some(edge_id));
                    frontier.push(Candidate {
                        cost: candidate,
                        vertex: opposite,
                    });
                }
            }
        }

        tree
    }

    /// Computes the cheapest path from `start` to `end`.
    ///
    /// The result reads start to end as `(vertex, edge used to reach it)`
    /// pairs, with the start step carrying no edge. An empty path means `end`
    /// is unreachable; callers must treat that as "no path", not as failure.
    ///
    /// # Example
    ///
    /// ```
    /// # use netgraph::{Gfid, NetworkGraph};
    /// let mut graph = NetworkGraph::new();
    /// let (a, b) = (Gfid::new(1), Gfid::new(2));
    /// graph.add_edge(Gfid::new(10), a, b, false, 1.0, 1.0).unwrap();
    ///
    /// assert_eq!(graph.dijkstra_shortest_path(a, b).len(), 2);
    /// assert!(graph.dijkstra_shortest_path(b, a).is_empty());
    /// ```
    pub fn dijkstra_shortest_path(&self, start: Gfid, end: Gfid) -> Path {
        let tree = self.shortest_path_tree(start, &CostOverlay::new());
        reconstruct_path(self, &tree, end)
    }
}

/// Walks a best-path tree backwards from `end` to the tree's root and returns
/// the forward-reading path. Empty when `end` has no tree entry.
pub(crate) fn reconstruct_path(graph: &NetworkGraph, tree: &PathTree, end: Gfid) -> Path {
    let mut steps: Path = Vec::new();
    let mut current = end;

    loop {
        let incoming = match tree.get(&current) {
            Some(&incoming) => incoming,
            None => return Vec::new(),
        };
        steps.push((current, incoming));

        match incoming {
            // Reached the root of the tree, i.e. the start vertex.
            None => break,
            Some(edge_id) => match graph.opposite_vertex(edge_id, current) {
                Some(previous) => current = previous,
                None => return Vec::new(),
            },
        }
    }

    steps.reverse();
    steps
}
