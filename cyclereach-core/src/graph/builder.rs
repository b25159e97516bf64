use std::sync::Arc;

use geo::{Coord, Point};
use hashbrown::HashMap;
use log::info;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::{
    Error,
    model::{CostedSegment, StreetEdge, StreetGraph, StreetNode},
};

/// Exact coordinate identity used to merge segment endpoints into nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey(u64, u64);

impl From<Coord<f64>> for CoordKey {
    fn from(c: Coord<f64>) -> Self {
        // `+ 0.0` so that -0.0 and 0.0 hash alike
        Self((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
    }
}

/// Links segments into an undirected multigraph.
///
/// Endpoints with identical coordinates share a node. Segments that cross
/// without a common endpoint stay disconnected at the crossing.
pub fn build_street_graph(segments: &[CostedSegment]) -> Result<StreetGraph, Error> {
    let mut graph = UnGraph::with_capacity(segments.len(), segments.len());
    let mut nodes: HashMap<CoordKey, NodeIndex> = HashMap::with_capacity(segments.len());

    for segment in segments {
        let (Some(start), Some(end)) = (segment.segment.start(), segment.segment.end()) else {
            return Err(Error::GeometryError(format!(
                "segment {} has no endpoints",
                segment.id()
            )));
        };

        let mut node_for = |coord: Coord<f64>| {
            *nodes.entry(CoordKey::from(coord)).or_insert_with(|| {
                graph.add_node(StreetNode {
                    geometry: Point::from(coord),
                })
            })
        };
        let source = node_for(start);
        let target = node_for(end);

        graph.add_edge(source, target, StreetEdge::new(Arc::new(segment.clone())));
    }

    info!(
        "Built street graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(StreetGraph::new(graph))
}

#[cfg(test)]
mod tests {
    use petgraph::visit::EdgeRef;

    use super::*;
    use crate::{model::Suitability, test_support::costed};

    fn segment(id: usize, coords: Vec<(f64, f64)>) -> CostedSegment {
        costed(id, coords, Some(0.3), Suitability::Low)
    }

    #[test]
    fn shared_endpoints_become_one_node() {
        let segments = vec![
            segment(0, vec![(0.0, 0.0), (1.0, 0.0)]),
            segment(1, vec![(1.0, 0.0), (2.0, 0.0)]),
            segment(2, vec![(2.0, 0.0), (1.0, 0.0)]),
        ];
        let graph = build_street_graph(&segments).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn crossings_are_not_merged() {
        let segments = vec![
            segment(0, vec![(-1.0, 0.0), (1.0, 0.0)]),
            segment(1, vec![(0.0, -1.0), (0.0, 1.0)]),
        ];
        let graph = build_street_graph(&segments).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(crate::graph::component_count(&graph), 2);
    }

    #[test]
    fn edges_follow_geometry_direction() {
        let segments = vec![segment(7, vec![(0.0, 0.0), (0.5, 0.5), (1.0, 0.0)])];
        let graph = build_street_graph(&segments).unwrap();
        let edge = graph.edge_references().next().unwrap();
        let (a, b) = graph.graph.edge_endpoints(edge.id()).unwrap();
        assert_eq!(graph.graph[a].geometry, Point::new(0.0, 0.0));
        assert_eq!(graph.graph[b].geometry, Point::new(1.0, 0.0));
        assert_eq!(edge.weight().segment_id(), 7);
    }

    #[test]
    fn closed_ring_is_a_self_loop() {
        let segments = vec![segment(
            0,
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)],
        )];
        let graph = build_street_graph(&segments).unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn negative_zero_matches_zero() {
        assert_eq!(
            CoordKey::from(Coord { x: -0.0, y: 1.0 }),
            CoordKey::from(Coord { x: 0.0, y: 1.0 })
        );
    }
}
