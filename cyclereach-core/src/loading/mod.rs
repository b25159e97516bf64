//! This module is responsible for loading input data (street features,
//! destinations, elevation) and building the routable street network.

mod area;
mod builder;
mod config;
pub mod destinations;
mod elevation;
mod normalize;
pub mod streets;

pub use area::AreaOfInterest;
pub use builder::{AnalysisReport, PipelineSummary, PreparedNetwork, prepare_network};
pub use config::{AnalysisConfig, Location};
pub use elevation::{AsciiGrid, ElevationSurface};
pub use normalize::{NormalizationStats, NormalizedSegments, StreetFeature, normalize_features};
