//! Optional connectivity repair: split segments at interior vertices that
//! other segments also record.

use geo::LineString;
use hashbrown::HashMap;
use itertools::Itertools;
use log::info;

use super::CoordKey;
use crate::{
    cost::{segment_length_km, travel_time},
    model::{CostedSegment, RoadSegment},
};

/// Splits every segment at interior vertices shared with another segment.
///
/// Geometry is unchanged apart from the cut points. Pieces keep the parent's
/// tags, gradient, speed and suitability; length and time are recomputed per
/// piece. Segment ids are renumbered in output order.
pub fn split_at_shared_vertices(segments: &[CostedSegment]) -> Vec<CostedSegment> {
    // Number of distinct segments that record each coordinate
    let mut usage: HashMap<CoordKey, usize> = HashMap::new();
    for segment in segments {
        for key in segment.geometry().coords().map(|c| CoordKey::from(*c)).unique() {
            *usage.entry(key).or_default() += 1;
        }
    }
    let is_shared = |key: CoordKey| usage.get(&key).is_some_and(|count| *count > 1);

    let mut pieces = Vec::with_capacity(segments.len());
    let mut split_count = 0;
    for segment in segments {
        let coords = &segment.geometry().0;
        let mut start = 0;
        for i in 1..coords.len().saturating_sub(1) {
            if is_shared(CoordKey::from(coords[i])) {
                pieces.push(piece(segment, LineString::new(coords[start..=i].to_vec())));
                start = i;
                split_count += 1;
            }
        }
        if start == 0 {
            pieces.push(segment.clone());
        } else {
            pieces.push(piece(segment, LineString::new(coords[start..].to_vec())));
        }
    }

    for (id, piece) in pieces.iter_mut().enumerate() {
        piece.segment.id = id;
    }

    info!(
        "Split segments at {split_count} shared interior vertices: {} -> {} segments",
        segments.len(),
        pieces.len()
    );
    pieces
}

fn piece(parent: &CostedSegment, geometry: LineString<f64>) -> CostedSegment {
    let length_km = segment_length_km(&geometry);
    CostedSegment {
        segment: RoadSegment {
            id: parent.id(),
            feature: parent.segment.feature,
            geometry,
            tags: parent.segment.tags.clone(),
        },
        length_km,
        gradient_pct: parent.gradient_pct,
        speed_kmh: parent.speed_kmh,
        time_min: parent.speed_kmh.map(|speed| travel_time(length_km, speed)),
        suitability: parent.suitability,
    }
}
