//! Street network components - nodes and edges

use std::sync::Arc;

use geo::{LineString, Point};

use crate::{Minutes, SegmentId, Suitability, model::CostedSegment};

/// Street graph node, a location shared by segment endpoints
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Street graph edge, one per segment
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Segment with all its attributes, shared between filtered graphs
    pub segment: Arc<CostedSegment>,
}

impl StreetEdge {
    pub fn new(segment: Arc<CostedSegment>) -> Self {
        Self { segment }
    }

    pub fn segment_id(&self) -> SegmentId {
        self.segment.id()
    }

    /// Cycling time in minutes, `None` if it could not be derived
    pub fn travel_time(&self) -> Option<Minutes> {
        self.segment.time_min
    }

    pub fn suitability(&self) -> Suitability {
        self.segment.suitability
    }

    pub fn geometry(&self) -> &LineString<f64> {
        self.segment.geometry()
    }
}
