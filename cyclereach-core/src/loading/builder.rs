use log::{info, warn};
use serde::Serialize;

use super::{AnalysisConfig, AreaOfInterest, ElevationSurface, StreetFeature, normalize_features};
use crate::{
    Error, PipelineStage,
    algo::{ScenarioReport, run_scenarios},
    cost::enrich_segments,
    graph::{
        build_street_graph, component_count, largest_component, routable,
        split_at_shared_vertices,
    },
    model::{CostedSegment, Destination, StreetGraph},
};

/// Counts collected while the network is prepared
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub features_in: usize,
    pub features_outside_area: usize,
    pub degenerate_parts_dropped: usize,
    pub segments: usize,
    /// Segments excluded from routing because elevation could not be sampled
    pub segments_missing_elevation: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub components: usize,
    pub routable_nodes: usize,
    pub routable_edges: usize,
}

/// Street network ready for accessibility queries
#[derive(Debug, Clone)]
pub struct PreparedNetwork {
    pub area: AreaOfInterest,
    /// Enriched segments, including those without travel time
    pub segments: Vec<CostedSegment>,
    /// Graph of every segment
    pub full_graph: StreetGraph,
    /// Largest component of the graph of timed edges
    pub graph: StreetGraph,
    pub summary: PipelineSummary,
}

/// Outcome of every configured scenario for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: PipelineSummary,
    pub destinations_used: usize,
    /// Destinations dropped because they lie outside the area of interest
    pub destinations_outside_area: usize,
    pub scenarios: Vec<ScenarioReport>,
}

impl PreparedNetwork {
    /// Keeps destinations inside the area of interest and evaluates every
    /// scenario of `config` from its origin
    pub fn analyze(
        &self,
        destinations: Vec<Destination>,
        config: &AnalysisConfig,
    ) -> (Vec<Destination>, AnalysisReport) {
        let (destinations, outside) = self.area.retain_destinations(destinations);
        if outside > 0 {
            warn!("Excluded {outside} destinations outside the area of interest");
        }

        let scenarios = run_scenarios(
            &self.graph,
            &config.origin.point(),
            &destinations,
            &config.scenarios,
        );

        let report = AnalysisReport {
            summary: self.summary.clone(),
            destinations_used: destinations.len(),
            destinations_outside_area: outside,
            scenarios,
        };
        (destinations, report)
    }
}

/// Creates the routable street network from raw features
///
/// # Errors
///
/// Returns an error naming the stage that failed when the configuration is
/// invalid or the input data or geometry cannot be processed
pub fn prepare_network<S>(
    features: &[StreetFeature],
    elevation: &S,
    config: &AnalysisConfig,
) -> Result<PreparedNetwork, Error>
where
    S: ElevationSurface + ?Sized,
{
    config
        .validate()
        .map_err(|e| e.in_stage(PipelineStage::Configuration))?;
    let area = AreaOfInterest::circle(config.center().point(), config.radius_km)
        .map_err(|e| e.in_stage(PipelineStage::Configuration))?;

    info!(
        "Normalizing {} street features within {} km",
        features.len(),
        config.radius_km
    );
    let normalized =
        normalize_features(features, &area).map_err(|e| e.in_stage(PipelineStage::Normalization))?;

    let costed = enrich_segments(&normalized.segments, elevation, &config.speed)
        .map_err(|e| e.in_stage(PipelineStage::CostModel))?;

    let segments = if config.split_shared_vertices {
        split_at_shared_vertices(&costed.segments)
    } else {
        costed.segments
    };

    let full_graph =
        build_street_graph(&segments).map_err(|e| e.in_stage(PipelineStage::GraphBuild))?;

    let components = component_count(&full_graph);
    let graph = largest_component(&routable(&full_graph));
    if graph.is_empty() {
        return Err(Error::DataError(
            "no street segment with a defined travel time remains".to_string(),
        )
        .in_stage(PipelineStage::Connectivity));
    }
    if components > 1 {
        warn!(
            "Street graph has {components} components, routing on the largest ({} of {} nodes)",
            graph.node_count(),
            full_graph.node_count()
        );
    }

    let summary = PipelineSummary {
        features_in: normalized.stats.features_in,
        features_outside_area: normalized.stats.features_outside,
        degenerate_parts_dropped: normalized.stats.degenerate_parts,
        segments: segments.len(),
        segments_missing_elevation: costed.missing_elevation,
        graph_nodes: full_graph.node_count(),
        graph_edges: full_graph.edge_count(),
        components,
        routable_nodes: graph.node_count(),
        routable_edges: graph.edge_count(),
    };
    info!("Street network prepared: {summary:?}");

    Ok(PreparedNetwork {
        area,
        segments,
        full_graph,
        graph,
        summary,
    })
}
