//! Data model for street segments, the street graph and destinations

pub mod destination;
pub mod segment;
pub mod streets;
pub mod suitability;
pub mod tags;

pub use destination::Destination;
pub use segment::{CostedSegment, RoadSegment};
pub use streets::network::StreetGraph;
pub use streets::{Anchor, Attachment, StreetEdge, StreetNode};
pub use suitability::{Suitability, SuitabilityFilter};
pub use tags::Tags;
