//! Cost distance from one origin to many destinations

use geo::Point;
use hashbrown::HashMap;
use log::debug;
use petgraph::graph::NodeIndex;
use serde::{Serialize, Serializer};

use crate::{
    Minutes,
    model::{Anchor, Attachment, Destination, StreetGraph},
    routing::dijkstra_path_weights,
};

/// Cost distance to a destination.
///
/// `Unreachable` means no path exists in the queried graph; it is distinct
/// from any finite cost, however large.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TravelCost {
    Minutes(Minutes),
    Unreachable,
}

impl TravelCost {
    pub fn minutes(self) -> Option<Minutes> {
        match self {
            Self::Minutes(minutes) => Some(minutes),
            Self::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Self::Minutes(_))
    }

    /// Finite and strictly below `threshold`
    pub fn within(self, threshold: Minutes) -> bool {
        matches!(self, Self::Minutes(minutes) if minutes.is_finite() && minutes < threshold)
    }
}

impl Serialize for TravelCost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.minutes().serialize(serializer)
    }
}

/// Cost distance of a single destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationCost {
    /// Position in the queried destination slice
    pub index: usize,
    pub id: String,
    #[serde(rename = "minutes")]
    pub cost: TravelCost,
    /// Distance from the destination to the street it was snapped to, in meters
    pub offset_m: Option<f64>,
}

/// Result of one accessibility query, owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessibilityResult {
    /// Distance from the origin to the street it was snapped to, in meters;
    /// `None` if there was no street to snap to
    pub origin_offset_m: Option<f64>,
    pub costs: Vec<DestinationCost>,
}

impl AccessibilityResult {
    /// Destinations whose cost is finite and strictly below `threshold`
    pub fn reachable(&self, threshold: Minutes) -> impl Iterator<Item = &DestinationCost> {
        self.costs.iter().filter(move |c| c.cost.within(threshold))
    }

    pub fn reachable_count(&self, threshold: Minutes) -> usize {
        self.reachable(threshold).count()
    }

    /// Destinations with no path at all
    pub fn unreachable_count(&self) -> usize {
        self.costs.iter().filter(|c| !c.cost.is_reachable()).count()
    }
}

/// Origin and destinations anchored on a street graph.
///
/// Anchors refer to segments, not to graph indices, so one snapping pass on
/// the unfiltered graph serves every filtered graph derived from it. A point
/// whose segment was filtered out is unreachable in that graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SnappedPoints {
    pub origin: Option<Anchor>,
    pub destinations: Vec<SnappedDestination>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnappedDestination {
    pub id: String,
    pub anchor: Option<Anchor>,
}

impl SnappedPoints {
    pub fn snap(graph: &StreetGraph, origin: &Point<f64>, destinations: &[Destination]) -> Self {
        Self {
            origin: graph.anchor(origin),
            destinations: destinations
                .iter()
                .map(|d| SnappedDestination {
                    id: d.id.clone(),
                    anchor: graph.anchor(&d.geometry),
                })
                .collect(),
        }
    }
}

/// Minimum travel time from `origin` to every destination over `graph`.
///
/// Origin and destinations are attached to their nearest edge of `graph`;
/// travel along the partial edges is charged proportionally to the position
/// on the edge.
pub fn compute_accessibility(
    graph: &StreetGraph,
    origin: &Point<f64>,
    destinations: &[Destination],
) -> AccessibilityResult {
    accessibility_from_snapped(graph, &SnappedPoints::snap(graph, origin, destinations))
}

/// Accessibility of already anchored points over `graph`.
///
/// A single Dijkstra run serves all destinations and stops as soon as every
/// destination edge endpoint is settled.
pub fn accessibility_from_snapped(graph: &StreetGraph, snapped: &SnappedPoints) -> AccessibilityResult {
    let origin_offset_m = snapped.origin.map(|anchor| anchor.offset_m);
    let attachments: Vec<Option<Attachment>> = snapped
        .destinations
        .iter()
        .map(|d| d.anchor.and_then(|anchor| graph.resolve(&anchor)))
        .collect();

    let start = snapped
        .origin
        .and_then(|anchor| graph.resolve(&anchor))
        .and_then(|a| edge_time(graph, &a).map(|time| (a, time)));

    let Some((start, start_time)) = start else {
        debug!("Origin is not attached to the graph, all destinations are unreachable");
        return AccessibilityResult {
            origin_offset_m,
            costs: collect_costs(snapped, &attachments, |_| TravelCost::Unreachable),
        };
    };

    let sources = [
        (start.source, start.fraction * start_time),
        (start.target, (1.0 - start.fraction) * start_time),
    ];
    let targets: Vec<NodeIndex> = attachments
        .iter()
        .flatten()
        .flat_map(|a| [a.source, a.target])
        .collect();
    let distances = dijkstra_path_weights(graph, &sources, Some(&targets), None);

    AccessibilityResult {
        origin_offset_m,
        costs: collect_costs(snapped, &attachments, |attachment| {
            attached_cost(graph, &start, start_time, attachment, &distances)
        }),
    }
}

fn collect_costs<F>(
    snapped: &SnappedPoints,
    attachments: &[Option<Attachment>],
    cost_of: F,
) -> Vec<DestinationCost>
where
    F: Fn(&Attachment) -> TravelCost,
{
    snapped
        .destinations
        .iter()
        .zip(attachments)
        .enumerate()
        .map(|(index, (destination, attachment))| DestinationCost {
            index,
            id: destination.id.clone(),
            cost: attachment
                .as_ref()
                .map_or(TravelCost::Unreachable, &cost_of),
            offset_m: destination.anchor.map(|a| a.offset_m),
        })
        .collect()
}

fn edge_time(graph: &StreetGraph, attachment: &Attachment) -> Option<Minutes> {
    graph.edge(attachment.edge)?.travel_time()
}

fn attached_cost(
    graph: &StreetGraph,
    start: &Attachment,
    start_time: Minutes,
    attachment: &Attachment,
    distances: &HashMap<NodeIndex, Minutes>,
) -> TravelCost {
    let Some(time) = edge_time(graph, attachment) else {
        return TravelCost::Unreachable;
    };

    let via_source = distances
        .get(&attachment.source)
        .map(|d| d + attachment.fraction * time);
    let via_target = distances
        .get(&attachment.target)
        .map(|d| d + (1.0 - attachment.fraction) * time);
    let along_edge = (attachment.edge == start.edge)
        .then(|| (attachment.fraction - start.fraction).abs() * start_time);

    [via_source, via_target, along_edge]
        .into_iter()
        .flatten()
        .min_by(f64::total_cmp)
        .map_or(TravelCost::Unreachable, TravelCost::Minutes)
}

#[cfg(test)]
mod tests {
    use geo::point;

    use super::*;
    use crate::{
        model::Suitability,
        test_support::{graph, road},
    };

    fn dest(id: &str, x: f64, y: f64) -> Destination {
        Destination::new(id, Point::new(x, y))
    }

    fn close(cost: TravelCost, expected: Minutes) -> bool {
        cost.minutes().is_some_and(|m| (m - expected).abs() < 1e-9)
    }

    #[test]
    fn costs_along_a_street() {
        let g = graph(&[
            road(0, (0.0, 0.0), (0.01, 0.0), 4.0, Suitability::Low),
            road(1, (0.01, 0.0), (0.02, 0.0), 6.0, Suitability::Low),
        ]);
        let result = compute_accessibility(
            &g,
            &point!(x: 0.0, y: 0.0),
            &[dest("a", 0.01, 0.0), dest("b", 0.015, 0.0001), dest("c", 0.0025, 0.0)],
        );

        assert!(close(result.costs[0].cost, 4.0));
        assert!(close(result.costs[1].cost, 7.0));
        // same edge as the origin
        assert!(close(result.costs[2].cost, 1.0));
        assert_eq!(result.reachable_count(5.0), 2);
        assert_eq!(result.unreachable_count(), 0);
    }

    #[test]
    fn origin_inside_an_edge_starts_both_ways() {
        let g = graph(&[
            road(0, (0.0, 0.0), (0.01, 0.0), 10.0, Suitability::Low),
            road(1, (0.0, 0.0), (0.0, 0.01), 2.0, Suitability::Low),
        ]);
        let result = compute_accessibility(
            &g,
            &point!(x: 0.002, y: 0.0),
            &[dest("north", 0.0, 0.01), dest("east", 0.01, 0.0)],
        );
        assert!(close(result.costs[0].cost, 4.0));
        assert!(close(result.costs[1].cost, 8.0));
    }

    #[test]
    fn empty_graph_makes_everything_unreachable() {
        let g = graph(&[]);
        let result = compute_accessibility(&g, &point!(x: 0.0, y: 0.0), &[dest("a", 0.0, 0.0)]);
        assert_eq!(result.costs[0].cost, TravelCost::Unreachable);
        assert_eq!(result.origin_offset_m, None);
        assert_eq!(result.reachable_count(f64::MAX), 0);
    }

    #[test]
    fn filtered_out_anchor_is_unreachable() {
        let g = graph(&[
            road(0, (0.0, 0.0), (0.01, 0.0), 2.0, Suitability::Good),
            road(1, (0.01, 0.0), (0.02, 0.0), 2.0, Suitability::Low),
        ]);
        let snapped = SnappedPoints::snap(
            &g,
            &point!(x: 0.0, y: 0.0),
            &[dest("good", 0.005, 0.0001), dest("low", 0.015, 0.0001)],
        );
        let good_only = crate::graph::filter_by_suitability(
            &g,
            &crate::model::SuitabilityFilter::only(&[Suitability::Good]),
        );

        let all = accessibility_from_snapped(&g, &snapped);
        let good = accessibility_from_snapped(&good_only, &snapped);
        assert!(close(all.costs[1].cost, 3.0));
        assert!(close(good.costs[0].cost, 1.0));
        assert_eq!(good.costs[1].cost, TravelCost::Unreachable);
        assert!(good.costs[1].offset_m.is_some());
    }

    #[test]
    fn threshold_is_strict() {
        assert!(TravelCost::Minutes(5.9).within(6.0));
        assert!(!TravelCost::Minutes(6.0).within(6.0));
        assert!(!TravelCost::Minutes(f64::INFINITY).within(f64::INFINITY));
        assert!(!TravelCost::Unreachable.within(f64::MAX));
    }

    #[test]
    fn unreachable_serializes_as_null() {
        let json = serde_json::to_value(DestinationCost {
            index: 0,
            id: "x".to_string(),
            cost: TravelCost::Unreachable,
            offset_m: None,
        })
        .unwrap();
        assert!(json["minutes"].is_null());
    }
}
