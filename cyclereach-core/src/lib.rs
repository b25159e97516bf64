//! Cycling accessibility analysis over street segment data.
//!
//! The crate turns raw street line features into a routable, weighted street
//! graph and answers which destinations can be reached from a fixed origin
//! within a travel time budget under a suitability constraint.
//!
//! Stages run strictly in order, each returning a new collection:
//!
//! 1. [`loading::normalize_features`] clips raw features to the area of
//!    interest and splits them into simple segments.
//! 2. [`cost::enrich_segments`] attaches length, gradient, speed, travel time
//!    and suitability.
//! 3. [`graph::build_street_graph`] links segment endpoints into shared nodes.
//! 4. [`graph::connectivity`] labels components and filters the graph.
//! 5. [`algo::accessibility`] computes cost distances to destinations.

pub mod algo;
pub mod cost;
pub mod error;
pub mod export;
pub mod graph;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, PipelineStage};
pub use model::{
    CostedSegment, Destination, RoadSegment, StreetGraph, Suitability, SuitabilityFilter, Tags,
};

/// Travel time in minutes
pub type Minutes = f64;
/// Distance in kilometers
pub type Kilometers = f64;
/// Speed in kilometers per hour
pub type KmPerHour = f64;
/// Position of a segment in the normalized collection
pub type SegmentId = usize;

pub use model::streets::network::{StreetEdgeId, StreetNodeId};
