//! The owning facade around the graph: persistence bootstrap, connectivity
//! rules, and identifier bookkeeping.
//!
//! A [`Network`] owns exactly one [`NetworkGraph`] together with the
//! allocator that mints identifiers for features the caller did not supply.
//! The graph is built lazily: the first mutating or querying call drains the
//! edge source once, and every later call reuses the in-memory structure.

use thiserror::Error;

use crate::graph::{GraphError, NetworkGraph};
use crate::ids::IdAllocator;
use crate::load::EdgeRecord;
use crate::{Gfid, Path};

/// Errors surfaced by [`Network`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("loading persisted edges failed: {0}")]
    Load(String),
    #[error("connection {source_id} -> {target_id} via {connector} violates the network rules")]
    RuleViolation {
        source_id: Gfid,
        target_id: Gfid,
        connector: Gfid,
    },
}

/// Source of persisted graph-edge records, drained once on first use.
pub trait EdgeSource {
    /// Every persisted graph-edge record, in storage order.
    fn edges(&mut self) -> Result<Vec<EdgeRecord>, NetworkError>;
}

/// Connectivity rules consulted before a connection is admitted.
///
/// The rule text itself ("ALLOW CONNECTS ..." strings) is parsed one layer
/// up; the graph core only ever sees the resulting yes/no answer.
pub trait ConnectivityPolicy {
    /// Whether `source` may be connected with `target` via `connector`.
    fn allows(&self, source: Gfid, target: Gfid, connector: Gfid) -> bool;
}

/// Identifiers resolved for a newly admitted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub source: Gfid,
    pub target: Gfid,
    pub connector: Gfid,
}

/// Selects the algorithm run by [`Network::route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingQuery {
    /// The single cheapest path.
    Shortest,
    /// Up to `k` loopless alternatives in ascending cost order.
    KShortest(usize),
    /// Everything reachable from either endpoint, both used as emitters.
    Connected,
}

/// The facade orchestrating persistence, the in-memory graph and the
/// connectivity rules.
pub struct Network<S> {
    graph: NetworkGraph,
    ids: IdAllocator,
    source: S,
    loaded: bool,
    policy: Option<Box<dyn ConnectivityPolicy>>,
}

impl<S: EdgeSource> Network<S> {
    /// Creates a network over a persisted edge source. Nothing is loaded
    /// until the first mutating or querying call.
    pub fn new(source: S) -> Self {
        Self {
            graph: NetworkGraph::new(),
            ids: IdAllocator::new(),
            source,
            loaded: false,
            policy: None,
        }
    }

    /// Installs the connectivity rules consulted by [`connect`](Self::connect).
    pub fn with_policy(mut self, policy: Box<dyn ConnectivityPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// The in-memory graph as loaded and mutated so far.
    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    fn ensure_loaded(&mut self) -> Result<(), NetworkError> {
        if self.loaded {
            return Ok(());
        }

        let records = self.source.edges()?;
        log::debug!("building graph from {} persisted edge records", records.len());
        for record in &records {
            self.ids.observe(record.connector);
            self.ids.observe(record.source);
            self.ids.observe(record.target);
            record.apply(&mut self.graph)?;
        }

        self.loaded = true;
        Ok(())
    }

    /// Connects `source` with `target` via `connector`, minting a virtual
    /// identifier for any of the three the caller does not supply.
    ///
    /// # Errors
    ///
    /// Fails without mutating the graph when the connectivity rules refuse
    /// the combination or the connector already denotes an existing edge.
    pub fn connect(
        &mut self,
        source: Option<Gfid>,
        target: Option<Gfid>,
        connector: Option<Gfid>,
        forward_cost: f64,
        inverse_cost: f64,
        bidirectional: bool,
    ) -> Result<Connection, NetworkError> {
        self.ensure_loaded()?;

        for id in [source, target, connector].into_iter().flatten() {
            self.ids.observe(id);
        }
        let source = source.unwrap_or_else(|| self.ids.mint_virtual());
        let target = target.unwrap_or_else(|| self.ids.mint_virtual());
        let connector = connector.unwrap_or_else(|| self.ids.mint_virtual());

        if let Some(policy) = &self.policy {
            if !policy.allows(source, target, connector) {
                return Err(NetworkError::RuleViolation {
                    source_id: source,
                    target_id: target,
                    connector,
                });
            }
        }

        self.graph
            .add_edge(connector, source, target, bidirectional, forward_cost, inverse_cost)?;

        Ok(Connection {
            source,
            target,
            connector,
        })
    }

    /// Removes the connection with the given connector. A silent no-op for
    /// an unknown connector.
    pub fn disconnect(&mut self, connector: Gfid) -> Result<(), NetworkError> {
        self.ensure_loaded()?;
        self.graph.delete_edge(connector);
        Ok(())
    }

    /// Removes every connection and vertex at once.
    pub fn disconnect_all(&mut self) -> Result<(), NetworkError> {
        self.ensure_loaded()?;
        self.graph.clear();
        Ok(())
    }

    /// Removes a vertex and every connection touching it.
    pub fn delete_vertex(&mut self, id: Gfid) -> Result<(), NetworkError> {
        self.ensure_loaded()?;
        self.graph.delete_vertex(id);
        Ok(())
    }

    /// Updates a connection's costs in place.
    pub fn change_edge(
        &mut self,
        connector: Gfid,
        forward_cost: f64,
        inverse_cost: f64,
    ) -> Result<(), NetworkError> {
        self.ensure_loaded()?;
        self.graph.change_edge(connector, forward_cost, inverse_cost);
        Ok(())
    }

    /// Blocks or unblocks the vertex or connection with the given
    /// identifier.
    pub fn change_block_state(&mut self, id: Gfid, blocked: bool) -> Result<(), NetworkError> {
        self.ensure_loaded()?;
        self.graph.change_block_state(id, blocked);
        Ok(())
    }

    /// Blocks or unblocks every vertex and connection at once.
    pub fn change_all_block_state(&mut self, blocked: bool) -> Result<(), NetworkError> {
        self.ensure_loaded()?;
        self.graph.change_all_block_state(blocked);
        Ok(())
    }

    /// Runs the selected routing query between `start` and `end`.
    ///
    /// `Shortest` and `Connected` return at most one path; `KShortest(k)`
    /// up to `k`. An unreachable target is an empty result, not an error.
    pub fn route(
        &mut self,
        start: Gfid,
        end: Gfid,
        query: RoutingQuery,
    ) -> Result<Vec<Path>, NetworkError> {
        self.ensure_loaded()?;
        match query {
            RoutingQuery::Shortest => {
                let path = self.graph.dijkstra_shortest_path(start, end);
                Ok(if path.is_empty() { Vec::new() } else { vec![path] })
            }
            RoutingQuery::KShortest(k) => Ok(self.graph.k_shortest_paths(start, end, k)),
            RoutingQuery::Connected => {
                let reached = self.graph.connected_components(&[start, end])?;
                Ok(vec![reached])
            }
        }
    }

    /// The single cheapest path from `start` to `end`; empty when
    /// unreachable.
    pub fn shortest_path(&mut self, start: Gfid, end: Gfid) -> Result<Path, NetworkError> {
        self.ensure_loaded()?;
        Ok(self.graph.dijkstra_shortest_path(start, end))
    }

    /// Up to `k` loopless paths from `start` to `end` in ascending cost
    /// order.
    pub fn k_shortest_paths(
        &mut self,
        start: Gfid,
        end: Gfid,
        k: usize,
    ) -> Result<Vec<Path>, NetworkError> {
        self.ensure_loaded()?;
        Ok(self.graph.k_shortest_paths(start, end, k))
    }

    /// The union of everything reachable from the given emitter vertices.
    pub fn connected_components(&mut self, emitters: &[Gfid]) -> Result<Path, NetworkError> {
        self.ensure_loaded()?;
        Ok(self.graph.connected_components(emitters)?)
    }
}
