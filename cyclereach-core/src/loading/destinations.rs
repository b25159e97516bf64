//! Destination (shelter) points from GeoJSON or CSV

use std::{io::Read, path::Path};

use geo::Point;
use geojson::feature::Id;
use serde::Deserialize;

use super::streets::feature_collection;
use crate::{Error, model::Destination};

/// Reads destinations from a `.csv` file or a GeoJSON file (any other extension)
pub fn read_destinations(path: &Path) -> Result<Vec<Destination>, Error> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        read_destinations_csv(std::fs::File::open(path)?)
    } else {
        parse_destinations_geojson(&std::fs::read_to_string(path)?)
    }
}

/// Point features; the id comes from the feature id, a `name` or `id`
/// property, or the position in the collection.
pub fn parse_destinations_geojson(content: &str) -> Result<Vec<Destination>, Error> {
    let collection = feature_collection(content)?;
    let mut destinations = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.into_iter().enumerate() {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| Error::DataError(format!("destination {index} has no geometry")))?;
        let point = match geo::Geometry::<f64>::try_from(geometry.clone()) {
            Ok(geo::Geometry::Point(point)) => point,
            Ok(_) => {
                return Err(Error::GeometryError(format!(
                    "destination {index} is not a point"
                )));
            }
            Err(e) => {
                return Err(Error::GeometryError(format!("destination {index}: {e}")));
            }
        };

        let id = match &feature.id {
            Some(Id::String(s)) => s.clone(),
            Some(Id::Number(n)) => n.to_string(),
            None => ["name", "id"]
                .iter()
                .find_map(|key| feature.property(key))
                .map(|value| match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| index.to_string()),
        };
        destinations.push(Destination::new(id, point));
    }

    Ok(destinations)
}

#[derive(Debug, Deserialize)]
struct DestinationRecord {
    lon: f64,
    lat: f64,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// CSV with `lon` and `lat` columns and optional `id` / `name`
pub fn read_destinations_csv<R: Read>(reader: R) -> Result<Vec<Destination>, Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut destinations = Vec::new();

    for (index, record) in reader.deserialize::<DestinationRecord>().enumerate() {
        let record = record?;
        if !record.lon.is_finite() || !record.lat.is_finite() {
            return Err(Error::GeometryError(format!(
                "destination {index} has non-finite coordinates"
            )));
        }
        let id = record
            .id
            .or(record.name)
            .unwrap_or_else(|| index.to_string());
        destinations.push(Destination::new(id, Point::new(record.lon, record.lat)));
    }

    Ok(destinations)
}
