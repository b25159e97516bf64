//! Undirected street graph with a spatial index over edge geometry

use geo::{Closest, ClosestPoint, Distance, Haversine, Line, LineLocatePoint, Point};
use hashbrown::HashMap;
use petgraph::{
    Undirected,
    graph::{EdgeIndex, EdgeReference, Edges, NodeIndex, UnGraph},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};

use super::{StreetEdge, StreetNode};
use crate::SegmentId;

pub type StreetNodeId = NodeIndex;
pub type StreetEdgeId = EdgeIndex;

/// One straight piece of an edge geometry, tagged with its edge
pub type IndexedLine = GeomWithData<Line<f64>, StreetEdgeId>;

/// Street network. Node identity is fixed at construction; the graph is never
/// mutated afterwards, filtering always produces a new graph.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    pub graph: UnGraph<StreetNode, StreetEdge>,
    rtree: RTree<IndexedLine>,
    edge_by_segment: HashMap<SegmentId, StreetEdgeId>,
}

/// Position on a street segment, valid in every graph that contains the segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub segment: SegmentId,
    /// Position along the segment geometry, 0 at its first vertex
    pub fraction: f64,
    /// Distance from the anchored point to the street in meters
    pub offset_m: f64,
}

/// Anchor resolved to an edge of a particular graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub edge: StreetEdgeId,
    /// Node at the start of the edge geometry
    pub source: StreetNodeId,
    /// Node at the end of the edge geometry
    pub target: StreetNodeId,
    /// Position along the edge, 0 at `source` and 1 at `target`
    pub fraction: f64,
    /// Distance from the query point to the street in meters
    pub offset_m: f64,
}

impl StreetGraph {
    pub fn new(graph: UnGraph<StreetNode, StreetEdge>) -> Self {
        let rtree = build_rtree(&graph);
        let edge_by_segment = graph
            .edge_references()
            .map(|edge| (edge.weight().segment_id(), edge.id()))
            .collect();
        Self {
            graph,
            rtree,
            edge_by_segment,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// A graph without edges cannot route anything
    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// All edges touching `node`; `source()` of each reference is `node`
    pub fn edges(&self, node: StreetNodeId) -> Edges<'_, StreetEdge, Undirected> {
        self.graph.edges(node)
    }

    pub fn edge_references(&self) -> impl Iterator<Item = EdgeReference<'_, StreetEdge>> {
        self.graph.edge_references()
    }

    pub fn degree(&self, node: StreetNodeId) -> usize {
        self.graph.edges(node).count()
    }

    pub fn node(&self, node: StreetNodeId) -> Option<&StreetNode> {
        self.graph.node_weight(node)
    }

    pub fn edge(&self, edge: StreetEdgeId) -> Option<&StreetEdge> {
        self.graph.edge_weight(edge)
    }

    pub fn edge_for_segment(&self, segment: SegmentId) -> Option<StreetEdgeId> {
        self.edge_by_segment.get(&segment).copied()
    }

    /// Number of edges whose travel time is undefined
    pub fn untimed_edge_count(&self) -> usize {
        self.graph
            .edge_weights()
            .filter(|edge| edge.travel_time().is_none())
            .count()
    }

    /// Projects `point` onto the nearest edge.
    ///
    /// Nearest-edge search runs on planar lon/lat distance, which is accurate
    /// enough at city scale. Returns `None` for a graph without edges.
    pub fn anchor(&self, point: &Point<f64>) -> Option<Anchor> {
        let nearest = self.rtree.nearest_neighbor(point)?;
        let edge = self.graph.edge_weight(nearest.data)?;

        let fraction = edge
            .geometry()
            .line_locate_point(point)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);

        let offset_m = match nearest.geom().closest_point(point) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => Haversine.distance(p, *point),
            Closest::Indeterminate => 0.0,
        };

        Some(Anchor {
            segment: edge.segment_id(),
            fraction,
            offset_m,
        })
    }

    /// Edge of this graph carrying the anchored segment, if it survived filtering
    pub fn resolve(&self, anchor: &Anchor) -> Option<Attachment> {
        let edge = self.edge_for_segment(anchor.segment)?;
        let (source, target) = self.graph.edge_endpoints(edge)?;
        Some(Attachment {
            edge,
            source,
            target,
            fraction: anchor.fraction,
            offset_m: anchor.offset_m,
        })
    }

    /// Anchors `point` on this graph and resolves it in one step
    pub fn attach(&self, point: &Point<f64>) -> Option<Attachment> {
        self.anchor(point).and_then(|anchor| self.resolve(&anchor))
    }
}

fn build_rtree(graph: &UnGraph<StreetNode, StreetEdge>) -> RTree<IndexedLine> {
    let lines = graph
        .edge_references()
        .flat_map(|edge| {
            let id = edge.id();
            edge.weight()
                .geometry()
                .lines()
                .map(move |line| GeomWithData::new(line, id))
        })
        .collect();

    RTree::bulk_load(lines)
}
