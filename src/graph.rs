use std::collections::BTreeMap;
use thiserror::Error;

use crate::{Gfid, PathStep};

/// A vertex of the network graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    /// Reversible "closed for routing" flag; a blocked vertex stays in the
    /// graph but is never reached by a traversal.
    blocked: bool,

    /// Edges leaving this vertex, in append order.
    ///
    /// A bidirectional edge is registered with both of its endpoints, so a
    /// bidirectional self-loop appears here twice.
    outgoing: Vec<Gfid>,
}

impl Vertex {
    /// Whether the vertex is currently excluded from traversal.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// The edges leaving this vertex, in the order they were registered.
    #[inline]
    pub fn outgoing(&self) -> &[Gfid] {
        &self.outgoing
    }
}

/// An edge (connector) of the network graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Gfid,
    target: Gfid,
    bidirectional: bool,
    forward_cost: f64,
    inverse_cost: f64,
    blocked: bool,
}

impl Edge {
    /// The endpoint the edge leaves when traversed forwards.
    #[inline]
    pub fn source(&self) -> Gfid {
        self.source
    }

    /// The endpoint the edge enters when traversed forwards.
    #[inline]
    pub fn target(&self) -> Gfid {
        self.target
    }

    /// Whether target-to-source traversal is permitted.
    #[inline]
    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    /// Cost of moving source to target.
    #[inline]
    pub fn forward_cost(&self) -> f64 {
        self.forward_cost
    }

    /// Cost of moving target to source.
    #[inline]
    pub fn inverse_cost(&self) -> f64 {
        self.inverse_cost
    }

    /// Whether the edge is currently excluded from traversal.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Cost of traversing the edge out of `from`: the forward cost when
    /// leaving the source endpoint, the inverse cost when leaving the target.
    #[inline]
    pub fn cost_from(&self, from: Gfid) -> f64 {
        if from == self.source {
            self.forward_cost
        } else {
            self.inverse_cost
        }
    }
}

/// The core mutable graph: vertices and edges keyed by externally assigned
/// [`Gfid`]s.
///
/// Vertices are created implicitly the first time an edge references them.
/// Both vertices and edges carry an independent reversible blocked flag that
/// excludes them from traversal without removing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkGraph {
    vertices: BTreeMap<Gfid, Vertex>,
    edges: BTreeMap<Gfid, Edge>,
}

impl NetworkGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex with the given identifier.
    ///
    /// A no-op if the vertex already exists; its blocked flag and outgoing
    /// edges are left untouched.
    pub fn add_vertex(&mut self, id: Gfid) {
        self.vertices.entry(id).or_default();
    }

    /// Removes a vertex and every edge touching it.
    ///
    /// A silent no-op if the vertex does not exist.
    ///
    /// # Example
    ///
    /// ```
    /// # use netgraph::{Gfid, NetworkGraph};
    /// let mut graph = NetworkGraph::new();
    /// graph.add_edge(Gfid::new(10), Gfid::new(1), Gfid::new(2), false, 1.0, 1.0).unwrap();
    ///
    /// graph.delete_vertex(Gfid::new(2));
    /// assert!(!graph.has_edge(Gfid::new(10)));
    /// assert!(graph.has_vertex(Gfid::new(1)));
    /// ```
    pub fn delete_vertex(&mut self, id: Gfid) {
        if self.vertices.remove(&id).is_none() {
            return;
        }

        let touching: Vec<Gfid> = self
            .edges
            .iter()
            .filter(|(_, edge)| edge.source == id || edge.target == id)
            .map(|(&edge_id, _)| edge_id)
            .collect();

        for edge_id in touching {
            self.delete_edge(edge_id);
        }
    }

    /// Inserts an edge between `source` and `target`, creating either vertex
    /// if it does not exist yet.
    ///
    /// The connector is appended to the source vertex's outgoing list, and to
    /// the target vertex's outgoing list as well when the edge is
    /// bidirectional; the target-side entry is what makes reverse traversal
    /// reachable.
    ///
    /// # Errors
    ///
    /// Fails without mutating the graph when `connector` already denotes an
    /// existing edge.
    pub fn add_edge(
        &mut self,
        connector: Gfid,
        source: Gfid,
        target: Gfid,
        bidirectional: bool,
        forward_cost: f64,
        inverse_cost: f64,
    ) -> Result<(), GraphError> {
        if self.edges.contains_key(&connector) {
            log::error!("edge {connector} already exists, connection rejected");
            return Err(GraphError::DuplicateEdge(connector));
        }

        self.add_vertex(source);
        self.add_vertex(target);

        self.edges.insert(
            connector,
            Edge {
                source,
                target,
                bidirectional,
                forward_cost,
                inverse_cost,
                blocked: false,
            },
        );

        if let Some(vertex) = self.vertices.get_mut(&source) {
            vertex.outgoing.push(connector);
        }
        if bidirectional {
            if let Some(vertex) = self.vertices.get_mut(&target) {
                vertex.outgoing.push(connector);
            }
        }

        Ok(())
    }

    /// Removes an edge and unregisters it from every vertex's outgoing list.
    ///
    /// A silent no-op if the edge does not exist.
    pub fn delete_edge(&mut self, connector: Gfid) {
        if self.edges.remove(&connector).is_none() {
            return;
        }

        for vertex in self.vertices.values_mut() {
            vertex.outgoing.retain(|&edge_id| edge_id != connector);
        }
    }

    /// Updates an edge's costs in place. A silent no-op if the edge does not
    /// exist.
    pub fn change_edge(&mut self, connector: Gfid, forward_cost: f64, inverse_cost: f64) {
        if let Some(edge) = self.edges.get_mut(&connector) {
            edge.forward_cost = forward_cost;
            edge.inverse_cost = inverse_cost;
        }
    }

    /// Sets the blocked flag of the vertex or edge with the given identifier.
    ///
    /// Vertices are checked before edges; the surrounding system never reuses
    /// an identifier across both categories. A silent no-op if neither
    /// matches.
    pub fn change_block_state(&mut self, id: Gfid, blocked: bool) {
        if let Some(vertex) = self.vertices.get_mut(&id) {
            vertex.blocked = blocked;
        } else if let Some(edge) = self.edges.get_mut(&id) {
            edge.blocked = blocked;
        }
    }

    /// Sets the blocked flag uniformly on every vertex and every edge.
    pub fn change_all_block_state(&mut self, blocked: bool) {
        for vertex in self.vertices.values_mut() {
            vertex.blocked = blocked;
        }
        for edge in self.edges.values_mut() {
            edge.blocked = blocked;
        }
    }

    /// Empties both collections.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing graph of {} vertices and {} edges",
            self.vertices.len(),
            self.edges.len()
        );
        self.vertices.clear();
        self.edges.clear();
    }

    /// Whether the graph has a vertex with the given identifier.
    #[inline]
    pub fn has_vertex(&self, id: Gfid) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Whether the graph has an edge with the given identifier.
    #[inline]
    pub fn has_edge(&self, id: Gfid) -> bool {
        self.edges.contains_key(&id)
    }

    /// Borrows the vertex with the given identifier.
    #[inline]
    pub fn vertex(&self, id: Gfid) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    /// Borrows the edge with the given identifier.
    #[inline]
    pub fn edge(&self, id: Gfid) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// The edges leaving a vertex, in registration order. Empty for an
    /// unknown vertex.
    pub fn outgoing_edges(&self, id: Gfid) -> &[Gfid] {
        self.vertices
            .get(&id)
            .map(|vertex| vertex.outgoing.as_slice())
            .unwrap_or(&[])
    }

    /// Number of vertices in the graph.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has neither vertices nor edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Iterator over the vertex identifiers of the graph, in ascending order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = Gfid> + '_ {
        self.vertices.keys().copied()
    }

    /// Iterator over the edge identifiers of the graph, in ascending order.
    pub fn edge_ids(&self) -> impl Iterator<Item = Gfid> + '_ {
        self.edges.keys().copied()
    }

    /// The endpoint of `edge` that is not `vertex`.
    ///
    /// For a self-loop both endpoints coincide and that vertex is returned.
    /// `None` if the edge does not exist or `vertex` is not one of its
    /// endpoints.
    pub fn opposite_vertex(&self, edge: Gfid, vertex: Gfid) -> Option<Gfid> {
        let edge = self.edges.get(&edge)?;
        if vertex == edge.source {
            Some(edge.target)
        } else if vertex == edge.target {
            Some(edge.source)
        } else {
            None
        }
    }

    /// Sums the true traversal cost along a path, charging each edge out of
    /// the vertex the step left from.
    pub fn path_cost(&self, path: &[PathStep]) -> f64 {
        path.windows(2)
            .map(|pair| {
                let (from, _) = pair[0];
                match pair[1].1.and_then(|edge_id| self.edge(edge_id)) {
                    Some(edge) => edge.cost_from(from),
                    None => 0.0,
                }
            })
            .sum()
    }
}

/// Error returned by the graph's mutation and query operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge {0} already exists")]
    DuplicateEdge(Gfid),
    #[error("reachability query requires at least one emitter")]
    NoEmitters,
}
