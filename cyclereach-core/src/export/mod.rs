//! Serialization of pipeline artifacts

mod geojson;

pub use self::geojson::{
    destinations_to_geojson, graph_to_geojson, segments_to_geojson, to_geojson_string,
};
