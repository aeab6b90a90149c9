//! Loopless K-shortest-paths enumeration.
//!
//! Yen's algorithm layered on the best-path-tree builder: each accepted path
//! is re-examined at every possible branch point ("spur node"), with the
//! already-consumed prefix and the continuations of previously accepted
//! paths priced out through a [`CostOverlay`](crate::CostOverlay) so the spur
//! search cannot rediscover them.

use crate::dijkstra::{reconstruct_path, CostOverlay};
use crate::graph::NetworkGraph;
use crate::{Gfid, Path};

impl NetworkGraph {
    /// Enumerates up to `k` loopless paths from `start` to `end`, ordered by
    /// ascending total cost.
    ///
    /// Fewer than `k` paths are returned when fewer loopless alternatives
    /// exist; the result is empty when no path exists at all or `k` is zero.
    /// No two returned paths are identical step sequences, though distinct
    /// paths may tie on cost.
    pub fn k_shortest_paths(&self, start: Gfid, end: Gfid, k: usize) -> Vec<Path> {
        if k == 0 {
            return Vec::new();
        }

        let first = self.dijkstra_shortest_path(start, end);
        if first.is_empty() {
            return Vec::new();
        }

        let mut accepted: Vec<Path> = vec![first];
        // Candidate pool ordered by ascending total cost; ties keep their
        // insertion order. Distinct paths may share a cost.
        let mut candidates: Vec<(f64, Path)> = Vec::new();

        for round in 1..k {
            let previous = accepted[round - 1].clone();

            // Spur positions run along the previous path, excluding its
            // final vertex.
            for spur_index in 0..previous.len() - 1 {
                let (spur_vertex, _) = previous[spur_index];
                let root = &previous[..=spur_index];

                let mut overlay = CostOverlay::new();

                // Price out the continuation edge of every accepted path
                // that shares this exact root, so the spur search must
                // branch somewhere new.
                for other in &accepted {
                    if other.len() > spur_index + 1 && other[..=spur_index] == *root {
                        if let Some(edge_id) = other[spur_index + 1].1 {
                            overlay.suppress(edge_id);
                        }
                    }
                }

                // Seal off the consumed prefix: nothing may leave a root
                // vertex that precedes the spur node, or the spur path could
                // loop back into it.
                for &(vertex, _) in &root[..spur_index] {
                    for &edge_id in self.outgoing_edges(vertex) {
                        overlay.suppress(edge_id);
                    }
                }

                let tree = self.shortest_path_tree(spur_vertex, &overlay);
                let spur = reconstruct_path(self, &tree, end);
                if spur.is_empty() {
                    continue;
                }

                // The spur path repeats the spur vertex as its first step.
                let mut full: Path = root.to_vec();
                full.extend_from_slice(&spur[1..]);

                // Price the candidate with the true costs, not the overlay.
                let cost = self.path_cost(&full);
                let position = candidates.partition_point(|&(other, _)| other <= cost);
                candidates.insert(position, (cost, full));
            }

            if candidates.is_empty() {
                break;
            }
            let (_, best) = candidates.remove(0);
            // Cost ties can materialise the same sequence more than once;
            // accept it only once.
            candidates.retain(|(_, path)| *path != best);
            accepted.push(best);
        }

        accepted
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::GraphError;

    fn gfid(raw: i64) -> Gfid {
        Gfid::new(raw)
    }

    /// Same shape as the shortest-path sample: a cheap 1-2-3 detour, a costly
    /// direct 1-3 edge, and a 3-4 tail.
    fn sample_graph() -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        graph.add_edge(gfid(10), gfid(1), gfid(2), true, 1.0, 1.0).unwrap();
        graph.add_edge(gfid(11), gfid(2), gfid(3), true, 1.0, 1.0).unwrap();
        graph.add_edge(gfid(12), gfid(1), gfid(3), true, 5.0, 5.0).unwrap();
        graph.add_edge(gfid(13), gfid(3), gfid(4), true, 1.0, 1.0).unwrap();
        graph
    }

    #[test]
    fn enumerates_alternatives_in_cost_order() {
        let graph = sample_graph();
        let paths = graph.k_shortest_paths(gfid(1), gfid(4), 3);

        // Only two loopless routes exist from 1 to 4.
        assert_eq!(paths.len(), 2);
        assert_eq!(
            paths[0],
            vec![
                (gfid(1), None),
                (gfid(2), Some(gfid(10))),
                (gfid(3), Some(gfid(11))),
                (gfid(4), Some(gfid(13))),
            ]
        );
        assert_eq!(
            paths[1],
            vec![
                (gfid(1), None),
                (gfid(3), Some(gfid(12))),
                (gfid(4), Some(gfid(13))),
            ]
        );
        assert_eq!(graph.path_cost(&paths[0]), 3.0);
        assert_eq!(graph.path_cost(&paths[1]), 6.0);
    }

    #[test]
    fn k_zero_returns_nothing() {
        let graph = sample_graph();
        assert!(graph.k_shortest_paths(gfid(1), gfid(4), 0).is_empty());
    }

    #[test]
    fn no_route_returns_nothing() {
        let mut graph = sample_graph();
        graph.add_vertex(gfid(9));
        assert!(graph.k_shortest_paths(gfid(1), gfid(9), 4).is_empty());
    }

    #[test]
    fn k_one_matches_dijkstra() {
        let graph = sample_graph();
        let paths = graph.k_shortest_paths(gfid(1), gfid(4), 1);
        assert_eq!(paths, vec![graph.dijkstra_shortest_path(gfid(1), gfid(4))]);
    }

    #[test]
    fn tied_routes_are_each_returned_once() {
        // Two parallel connectors between the same endpoints, equal cost:
        // physically distinct paths that tie.
        let mut graph = NetworkGraph::new();
        graph.add_edge(gfid(10), gfid(1), gfid(2), false, 2.0, 2.0).unwrap();
        graph.add_edge(gfid(11), gfid(1), gfid(2), false, 2.0, 2.0).unwrap();

        let paths = graph.k_shortest_paths(gfid(1), gfid(2), 4);
        assert_eq!(paths.len(), 2);
        assert_ne!(paths[0], paths[1]);
        assert_eq!(graph.path_cost(&paths[0]), 2.0);
        assert_eq!(graph.path_cost(&paths[1]), 2.0);
    }

    #[test]
    fn blocked_vertex_is_avoided_by_every_alternative() {
        let graph = {
            let mut graph = sample_graph();
            graph.change_block_state(gfid(2), true);
            graph
        };

        let paths = graph.k_shortest_paths(gfid(1), gfid(4), 3);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].iter().all(|&(vertex, _)| vertex != gfid(2)));
    }

    #[test]
    fn paths_are_loopless() {
        // A lattice with enough alternatives to exercise several rounds.
        let mut graph = NetworkGraph::new();
        graph.add_edge(gfid(10), gfid(1), gfid(2), true, 1.0, 1.0).unwrap();
        graph.add_edge(gfid(11), gfid(2), gfid(4), true, 1.0, 1.0).unwrap();
        graph.add_edge(gfid(12), gfid(1), gfid(3), true, 2.0, 2.0).unwrap();
        graph.add_edge(gfid(13), gfid(3), gfid(4), true, 2.0, 2.0).unwrap();
        graph.add_edge(gfid(14), gfid(2), gfid(3), true, 1.0, 1.0).unwrap();

        for path in graph.k_shortest_paths(gfid(1), gfid(4), 5) {
            let mut vertices: Vec<Gfid> = path.iter().map(|&(vertex, _)| vertex).collect();
            vertices.sort();
            vertices.dedup();
            assert_eq!(vertices.len(), path.len());
        }
    }

    proptest! {
        #[test]
        fn costs_are_monotone_and_paths_distinct(
            edges in proptest::collection::vec(
                (0i64..6, 0i64..6, 0.0f64..10.0, proptest::bool::ANY),
                1..12,
            ),
        ) {
            let mut graph = NetworkGraph::new();
            for (index, &(source, target, cost, bidirectional)) in edges.iter().enumerate() {
                match graph.add_edge(
                    gfid(100 + index as i64),
                    gfid(source),
                    gfid(target),
                    bidirectional,
                    cost,
                    cost,
                ) {
                    Ok(()) | Err(GraphError::DuplicateEdge(_)) => {}
                    Err(other) => return Err(TestCaseError::fail(other.to_string())),
                }
            }
            prop_assume!(graph.has_vertex(gfid(0)) && graph.has_vertex(gfid(5)));

            let paths = graph.k_shortest_paths(gfid(0), gfid(5), 4);

            let costs: Vec<f64> = paths.iter().map(|path| graph.path_cost(path)).collect();
            prop_assert!(costs.windows(2).all(|pair| pair[0] <= pair[1] + 1e-9));

            for (i, a) in paths.iter().enumerate() {
                for b in &paths[i + 1..] {
                    prop_assert_ne!(a, b);
                }
            }
        }
    }
}
