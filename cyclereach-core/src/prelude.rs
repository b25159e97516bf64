// Re-export key components
pub use crate::algo::{
    AccessibilityResult, Scenario, ScenarioReport, TravelCost, compute_accessibility,
    run_scenarios,
};
pub use crate::cost::{SpeedModel, enrich_segments};
pub use crate::export::{destinations_to_geojson, graph_to_geojson, segments_to_geojson};
pub use crate::graph::{build_street_graph, filter_by_suitability, largest_component, routable};
pub use crate::loading::{
    AnalysisConfig, AreaOfInterest, AsciiGrid, ElevationSurface, PreparedNetwork, StreetFeature,
    normalize_features, prepare_network,
};
pub use crate::model::{CostedSegment, Destination, StreetGraph, Suitability, SuitabilityFilter};

// Core types for the street network
pub use crate::Minutes;
pub use crate::StreetNodeId;
pub use crate::{Error, PipelineStage};
