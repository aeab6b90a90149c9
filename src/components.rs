//! Block-aware reachability from a set of emitter vertices.

use std::collections::{BTreeSet, VecDeque};

use crate::graph::{GraphError, NetworkGraph};
use crate::{Gfid, Path};

impl NetworkGraph {
    /// Expands a breadth-first traversal from every emitter at once and
    /// returns the union of all traversal steps as `(vertex, edge used to
    /// reach it)` pairs; the first vertex expanded carries no edge.
    ///
    /// Blocked vertices act as hard barriers: they are never reached and
    /// never expanded, except that a blocked emitter is still expanded,
    /// since blocking prevents a vertex from being reached, not from being
    /// used as a seed. A vertex discovered from two emitters before its own
    /// expansion appears once per discovering edge.
    ///
    /// # Errors
    ///
    /// Fails when `emitters` is empty; a seedless reachability query is an
    /// input error, not an empty result.
    pub fn connected_components(&self, emitters: &[Gfid]) -> Result<Path, GraphError> {
        if emitters.is_empty() {
            return Err(GraphError::NoEmitters);
        }

        let mut queue: VecDeque<Gfid> = emitters.iter().copied().collect();
        let mut visited: BTreeSet<Gfid> = BTreeSet::new();
        let mut reached: Path = Vec::new();

        while let Some(current) = queue.pop_front() {
            // Duplicates in the queue are expected; expand each vertex once.
            if !visited.insert(current) {
                continue;
            }
            if !self.has_vertex(current) {
                continue;
            }
            if reached.is_empty() {
                reached.push((current, None));
            }

            for &edge_id in self.outgoing_edges(current) {
                let edge = match self.edge(edge_id) {
                    Some(edge) => edge,
                    None => continue,
                };
                if edge.is_blocked() {
                    continue;
                }
                let opposite = match self.opposite_vertex(edge_id, current) {
                    Some(vertex) => vertex,
                    None => continue,
                };
                if visited.contains(&opposite) {
                    continue;
                }
                match self.vertex(opposite) {
                    Some(vertex) if !vertex.is_blocked() => {}
                    _ => continue,
                }

                reached.push((opposite, Some(edge_id)));
                queue.push_back(opposite);
            }
        }

        Ok(reached)
    }
}
