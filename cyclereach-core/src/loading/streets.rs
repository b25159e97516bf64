//! Street features from GeoJSON

use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::{Map, Value as JsonValue};

use super::StreetFeature;
use crate::{Error, model::Tags};

/// Reads street features from a GeoJSON `FeatureCollection` file
pub fn read_street_features(path: &Path) -> Result<Vec<StreetFeature>, Error> {
    let content = std::fs::read_to_string(path)?;
    parse_street_features(&content)
}

/// Parses street features; properties become tags, `null` properties are absent
pub fn parse_street_features(content: &str) -> Result<Vec<StreetFeature>, Error> {
    feature_collection(content)?
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| street_feature(index, feature))
        .collect()
}

pub(crate) fn feature_collection(content: &str) -> Result<FeatureCollection, Error> {
    let geojson = content
        .parse::<GeoJson>()
        .map_err(|e| Error::GeoJsonError(e.to_string()))?;
    FeatureCollection::try_from(geojson).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn street_feature(index: usize, feature: Feature) -> Result<StreetFeature, Error> {
    let geometry = feature
        .geometry
        .ok_or_else(|| Error::DataError(format!("street feature {index} has no geometry")))?;
    let geometry = geo::Geometry::<f64>::try_from(geometry)
        .map_err(|e| Error::GeometryError(format!("street feature {index}: {e}")))?;

    Ok(StreetFeature {
        geometry,
        tags: feature.properties.map(properties_to_tags).unwrap_or_default(),
    })
}

fn properties_to_tags(properties: Map<String, JsonValue>) -> Tags {
    properties
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                JsonValue::Null => return None,
                JsonValue::String(s) => s,
                other => other.to_string(),
            };
            Some((key, value))
        })
        .collect()
}
