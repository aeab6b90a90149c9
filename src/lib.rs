//! An in-memory routing graph over externally assigned feature identifiers.
//!
//! The graph is a directed, possibly-bidirectional, weighted multigraph whose
//! vertices and edges are keyed by [`Gfid`]s handed out by an external feature
//! store, not by dense internal indices. It supports incremental construction,
//! reversible blocking of vertices and edges, and three query families:
//! single shortest path, loopless K-shortest paths, and block-aware
//! reachability from a set of emitters.
//!
//! # Example
//!
//! ```
//! use netgraph::{Gfid, NetworkGraph};
//!
//! let mut graph = NetworkGraph::new();
//! let (a, b, c) = (Gfid::new(1), Gfid::new(2), Gfid::new(3));
//! graph.add_edge(Gfid::new(10), a, b, true, 1.0, 1.0).unwrap();
//! graph.add_edge(Gfid::new(11), b, c, true, 1.0, 1.0).unwrap();
//! graph.add_edge(Gfid::new(12), a, c, true, 5.0, 5.0).unwrap();
//!
//! let path = graph.dijkstra_shortest_path(a, c);
//! assert_eq!(path, vec![(a, None), (b, Some(Gfid::new(10))), (c, Some(Gfid::new(11)))]);
//! ```

use std::fmt;

pub mod components;
pub mod dijkstra;
pub mod graph;
pub mod ids;
pub mod load;
pub mod network;
pub mod yen;

pub use dijkstra::CostOverlay;
pub use graph::{GraphError, NetworkGraph};
pub use ids::IdAllocator;
pub use load::{BlockFlags, EdgeRecord};
pub use network::{Connection, ConnectivityPolicy, EdgeSource, Network, NetworkError, RoutingQuery};

/// A global feature identifier.
///
/// Identifiers are assigned by the external feature store and shared across
/// every layer of a network. Non-negative values denote persisted features;
/// strictly negative values are virtual identifiers minted by
/// [`IdAllocator`] for connection endpoints or connectors that have no
/// backing feature. `-1` is reserved by callers as the "no feature supplied
/// here, synthesize one" sentinel and is never minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gfid(i64);

impl Gfid {
    /// Wraps a raw identifier value.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whether this identifier is virtual, i.e. has no backing persisted
    /// feature.
    #[inline]
    pub const fn is_virtual(self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for Gfid {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Gfid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One step of a traversal result: the vertex reached and the edge used to
/// reach it. The edge is `None` for the vertex a traversal started from.
pub type PathStep = (Gfid, Option<Gfid>);

/// The universal result shape of every query: an ordered sequence of
/// [`PathStep`]s. For the path queries this reads start to end; for the
/// reachability query it is the union of all traversal steps.
pub type Path = Vec<PathStep>;
