use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use petgraph::visit::EdgeRef;
use serde_json::{Map, Value as JsonValue, json};

use crate::{
    Error,
    algo::ScenarioReport,
    model::{CostedSegment, Destination, StreetGraph, Tags},
};

/// Enriched segments with every derived attribute; undefined values are `null`
pub fn segments_to_geojson(segments: &[CostedSegment]) -> FeatureCollection {
    let features = segments
        .iter()
        .map(|segment| {
            let mut properties = segment_properties(segment);
            properties.insert("feature".to_string(), json!(segment.segment.feature));
            properties.insert("tags".to_string(), tags_json(segment.tags()));
            feature(
                Geometry::new(GeoJsonValue::from(segment.geometry())),
                properties,
            )
        })
        .collect();

    collection(features)
}

/// Edges as lines with their endpoint node ids, followed by nodes as points
pub fn graph_to_geojson(graph: &StreetGraph) -> FeatureCollection {
    let mut features = Vec::with_capacity(graph.edge_count() + graph.node_count());

    for edge in graph.edge_references() {
        let mut properties = segment_properties(&edge.weight().segment);
        properties.insert("element".to_string(), json!("edge"));
        properties.insert("source".to_string(), json!(edge.source().index()));
        properties.insert("target".to_string(), json!(edge.target().index()));
        features.push(feature(
            Geometry::new(GeoJsonValue::from(edge.weight().geometry())),
            properties,
        ));
    }

    for node in graph.graph.node_indices() {
        let mut properties = Map::new();
        properties.insert("element".to_string(), json!("node"));
        properties.insert("node".to_string(), json!(node.index()));
        properties.insert("degree".to_string(), json!(graph.degree(node)));
        features.push(feature(
            Geometry::new(GeoJsonValue::from(&graph.graph[node].geometry)),
            properties,
        ));
    }

    collection(features)
}

/// Destinations with their cost and reachability in one scenario
pub fn destinations_to_geojson(
    destinations: &[Destination],
    report: &ScenarioReport,
) -> Result<FeatureCollection, Error> {
    if destinations.len() != report.destinations.len() {
        return Err(Error::DataError(format!(
            "scenario '{}' has {} destination results for {} destinations",
            report.name,
            report.destinations.len(),
            destinations.len()
        )));
    }

    let features = destinations
        .iter()
        .zip(&report.destinations)
        .map(|(destination, cost)| {
            let mut properties = Map::new();
            properties.insert("id".to_string(), json!(destination.id));
            properties.insert("scenario".to_string(), json!(report.name));
            properties.insert("minutes".to_string(), json!(cost.cost.minutes()));
            properties.insert(
                "reachable".to_string(),
                json!(cost.cost.within(report.time_threshold_min)),
            );
            properties.insert("offset_m".to_string(), json!(cost.offset_m));
            feature(
                Geometry::new(GeoJsonValue::from(&destination.geometry)),
                properties,
            )
        })
        .collect();

    Ok(collection(features))
}

pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String, Error> {
    serde_json::to_string(collection).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn segment_properties(segment: &CostedSegment) -> Map<String, JsonValue> {
    let mut properties = Map::new();
    properties.insert("segment".to_string(), json!(segment.id()));
    properties.insert("length_km".to_string(), json!(segment.length_km));
    properties.insert("gradient_pct".to_string(), json!(segment.gradient_pct));
    properties.insert("speed_kmh".to_string(), json!(segment.speed_kmh));
    properties.insert("time_min".to_string(), json!(segment.time_min));
    properties.insert(
        "suitability".to_string(),
        json!(segment.suitability.as_str()),
    );
    if let Some(highway) = segment.tags().highway() {
        properties.insert("highway".to_string(), json!(highway));
    }
    properties
}

fn tags_json(tags: &Tags) -> JsonValue {
    JsonValue::Object(
        tags.iter()
            .map(|(k, v)| (k.to_string(), JsonValue::String(v.to_string())))
            .collect(),
    )
}

fn feature(geometry: Geometry, properties: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}
