//! The load boundary between persisted graph records and the in-memory
//! graph.
//!
//! The persistence layer stores block state as a packed 3-bit field per
//! graph-edge record. That representation stops here: applying a record
//! reconciles the packed bits into the two independent blocked booleans of
//! the in-memory model.

use bitflags::bitflags;

use crate::graph::{GraphError, NetworkGraph};
use crate::Gfid;

bitflags! {
    /// Packed per-record block state as stored by the persistence layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: u8 {
        /// The source endpoint is closed for routing.
        const SOURCE = 0x01;
        /// The target endpoint is closed for routing.
        const TARGET = 0x02;
        /// The connector itself is closed for routing.
        const CONNECTOR = 0x04;
    }
}

/// One persisted graph-edge record, as handed over by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub connector: Gfid,
    pub source: Gfid,
    pub target: Gfid,
    pub bidirectional: bool,
    pub forward_cost: f64,
    pub inverse_cost: f64,
    pub blocked: BlockFlags,
}

impl EdgeRecord {
    /// Inserts the record into `graph`, reconciling the packed block bits
    /// into the vertex and edge blocked flags.
    ///
    /// # Errors
    ///
    /// Fails when the connector already denotes an existing edge; the graph
    /// is left unchanged in that case.
    pub fn apply(&self, graph: &mut NetworkGraph) -> Result<(), GraphError> {
        graph.add_edge(
            self.connector,
            self.source,
            self.target,
            self.bidirectional,
            self.forward_cost,
            self.inverse_cost,
        )?;

        if self.blocked.contains(BlockFlags::SOURCE) {
            graph.change_block_state(self.source, true);
        }
        if self.blocked.contains(BlockFlags::TARGET) {
            graph.change_block_state(self.target, true);
        }
        if self.blocked.contains(BlockFlags::CONNECTOR) {
            graph.change_block_state(self.connector, true);
        }

        Ok(())
    }
}
