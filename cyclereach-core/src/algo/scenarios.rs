//! Accessibility scenarios: a suitability filter combined with a time budget

use std::borrow::Cow;

use geo::Point;
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{AccessibilityResult, DestinationCost, SnappedPoints, accessibility_from_snapped};
use crate::{
    Error, Minutes,
    graph::filter_by_suitability,
    model::{Destination, StreetGraph, SuitabilityFilter},
};

/// One accessibility question asked of the street graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Destinations count as reachable strictly below this many minutes
    pub time_threshold_min: Minutes,
    /// Levels an edge must have to be used; every level when omitted
    #[serde(default)]
    pub suitability_filter: SuitabilityFilter,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        time_threshold_min: Minutes,
        suitability_filter: SuitabilityFilter,
    ) -> Self {
        Self {
            name: name.into(),
            time_threshold_min,
            suitability_filter,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.time_threshold_min.is_finite() || self.time_threshold_min <= 0.0 {
            return Err(Error::Config(format!(
                "scenario '{}': time_threshold_min must be positive, got {}",
                self.name, self.time_threshold_min
            )));
        }
        if self.suitability_filter.is_empty() {
            return Err(Error::Config(format!(
                "scenario '{}': suitability_filter allows no level",
                self.name
            )));
        }
        Ok(())
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub time_threshold_min: Minutes,
    pub suitability_filter: SuitabilityFilter,
    /// Size of the filtered graph the query ran on
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub reachable_count: usize,
    /// Ids of destinations reachable within the threshold
    pub reachable: Vec<String>,
    /// Destinations with no path from the origin at all
    pub unreachable_count: usize,
    pub origin_offset_m: Option<f64>,
    pub destinations: Vec<DestinationCost>,
}

impl ScenarioReport {
    fn new(scenario: &Scenario, graph: &StreetGraph, result: AccessibilityResult) -> Self {
        let reachable: Vec<String> = result
            .reachable(scenario.time_threshold_min)
            .map(|c| c.id.clone())
            .collect();

        Self {
            name: scenario.name.clone(),
            time_threshold_min: scenario.time_threshold_min,
            suitability_filter: scenario.suitability_filter,
            graph_nodes: graph.node_count(),
            graph_edges: graph.edge_count(),
            reachable_count: reachable.len(),
            reachable,
            unreachable_count: result.unreachable_count(),
            origin_offset_m: result.origin_offset_m,
            destinations: result.costs,
        }
    }
}

/// Graph a scenario is evaluated on: `graph` itself when every level is
/// allowed, otherwise its filtered and isolation-pruned subgraph
fn scenario_graph<'a>(graph: &'a StreetGraph, scenario: &Scenario) -> Cow<'a, StreetGraph> {
    if scenario.suitability_filter.is_all() {
        Cow::Borrowed(graph)
    } else {
        Cow::Owned(filter_by_suitability(graph, &scenario.suitability_filter))
    }
}

/// Runs one scenario.
///
/// Origin and destinations are snapped to the nearest edge of the filtered
/// graph, so a point next to a dropped street attaches to the closest street
/// the scenario still allows.
pub fn run_scenario(
    graph: &StreetGraph,
    origin: &Point<f64>,
    destinations: &[Destination],
    scenario: &Scenario,
) -> ScenarioReport {
    let graph = scenario_graph(graph, scenario);
    let snapped = SnappedPoints::snap(&graph, origin, destinations);
    evaluate(&graph, &snapped, scenario)
}

/// Runs independent scenarios in parallel. Scenarios without a suitability
/// restriction share one snapping on `graph`.
pub fn run_scenarios(
    graph: &StreetGraph,
    origin: &Point<f64>,
    destinations: &[Destination],
    scenarios: &[Scenario],
) -> Vec<ScenarioReport> {
    let unfiltered = scenarios
        .iter()
        .any(|s| s.suitability_filter.is_all())
        .then(|| SnappedPoints::snap(graph, origin, destinations));

    scenarios
        .par_iter()
        .map(|scenario| match &unfiltered {
            Some(snapped) if scenario.suitability_filter.is_all() => {
                evaluate(graph, snapped, scenario)
            }
            _ => run_scenario(graph, origin, destinations, scenario),
        })
        .collect()
}

/// Query on `graph` with points already snapped to it
fn evaluate(graph: &StreetGraph, snapped: &SnappedPoints, scenario: &Scenario) -> ScenarioReport {
    if snapped.origin.is_none() {
        warn!(
            "Scenario '{}': no {} street to snap the origin to",
            scenario.name, scenario.suitability_filter
        );
    }

    let result = accessibility_from_snapped(graph, snapped);
    let report = ScenarioReport::new(scenario, graph, result);

    info!(
        "Scenario '{}' ({} min, {}): {} of {} destinations reachable, {} without any path",
        report.name,
        report.time_threshold_min,
        report.suitability_filter,
        report.reachable_count,
        snapped.destinations.len(),
        report.unreachable_count
    );
    report
}
