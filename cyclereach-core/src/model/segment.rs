//! Street segments before and after cost modelling

use geo::{Coord, LineString};

use super::{Suitability, Tags};
use crate::{Kilometers, KmPerHour, Minutes, SegmentId};

/// A single, non-branching street line produced by normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub id: SegmentId,
    /// Index of the raw feature the segment was cut from
    pub feature: usize,
    pub geometry: LineString<f64>,
    pub tags: Tags,
}

impl RoadSegment {
    pub fn start(&self) -> Option<Coord<f64>> {
        self.geometry.0.first().copied()
    }

    pub fn end(&self) -> Option<Coord<f64>> {
        self.geometry.0.last().copied()
    }
}

/// Segment with its derived travel attributes
#[derive(Debug, Clone, PartialEq)]
pub struct CostedSegment {
    pub segment: RoadSegment,
    pub length_km: Kilometers,
    /// Rise over run in percent, start to end. `None` if elevation was missing.
    pub gradient_pct: Option<f64>,
    pub speed_kmh: Option<KmPerHour>,
    /// Travel time in minutes. `None` marks the segment as unusable for routing.
    pub time_min: Option<Minutes>,
    pub suitability: Suitability,
}

impl CostedSegment {
    pub fn id(&self) -> SegmentId {
        self.segment.id
    }

    pub fn geometry(&self) -> &LineString<f64> {
        &self.segment.geometry
    }

    pub fn tags(&self) -> &Tags {
        &self.segment.tags
    }

    pub fn has_time(&self) -> bool {
        self.time_min.is_some()
    }
}
