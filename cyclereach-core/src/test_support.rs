//! Hand-built segments and graphs shared by unit tests

use geo::LineString;

use crate::{
    Minutes, StreetGraph,
    graph::build_street_graph,
    model::{CostedSegment, RoadSegment, Suitability, Tags},
};

pub(crate) fn costed(
    id: usize,
    coords: Vec<(f64, f64)>,
    time_min: Option<Minutes>,
    suitability: Suitability,
) -> CostedSegment {
    CostedSegment {
        segment: RoadSegment {
            id,
            feature: id,
            geometry: LineString::from(coords),
            tags: Tags::new(),
        },
        length_km: time_min.map_or(0.1, |t| t / 3.0),
        gradient_pct: time_min.map(|_| 0.0),
        speed_kmh: time_min.map(|_| 20.0),
        time_min,
        suitability,
    }
}

/// Straight two-vertex segment
pub(crate) fn road(
    id: usize,
    from: (f64, f64),
    to: (f64, f64),
    time_min: Minutes,
    suitability: Suitability,
) -> CostedSegment {
    costed(id, vec![from, to], Some(time_min), suitability)
}

pub(crate) fn graph(segments: &[CostedSegment]) -> StreetGraph {
    build_street_graph(segments).expect("test segments have endpoints")
}
