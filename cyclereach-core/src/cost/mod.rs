//! Cost model: length, gradient, speed, travel time and suitability per segment

pub mod speed;
pub mod suitability;

use geo::{Haversine, Length, LineString};
use log::{info, warn};
use rayon::prelude::*;

pub use speed::SpeedModel;
pub use suitability::{SUITABILITY_RULES, SuitabilityRule, classify, matching_rule};

use crate::{
    Error, Kilometers, KmPerHour, Minutes,
    loading::ElevationSurface,
    model::{CostedSegment, RoadSegment},
};

/// Output of the cost model stage
#[derive(Debug, Clone)]
pub struct CostedSegments {
    pub segments: Vec<CostedSegment>,
    /// Segments whose travel time is undefined because elevation was missing
    pub missing_elevation: usize,
}

/// Attaches travel attributes to every segment.
///
/// Segments whose gradient cannot be sampled keep `time_min = None` and are
/// counted in `missing_elevation`; they are not dropped here.
pub fn enrich_segments<S>(
    segments: &[RoadSegment],
    surface: &S,
    model: &SpeedModel,
) -> Result<CostedSegments, Error>
where
    S: ElevationSurface + ?Sized,
{
    model.validate()?;

    let segments: Vec<CostedSegment> = segments
        .par_iter()
        .map(|segment| cost_segment(segment, surface, model))
        .collect();

    let missing_elevation = segments.iter().filter(|s| !s.has_time()).count();
    if missing_elevation > 0 {
        warn!(
            "{missing_elevation} of {} segments have no elevation data and will be excluded from routing",
            segments.len()
        );
    }
    info!("Computed travel costs for {} segments", segments.len());

    Ok(CostedSegments {
        segments,
        missing_elevation,
    })
}

/// Cost attributes of a single segment. Pure in its inputs.
pub fn cost_segment<S>(segment: &RoadSegment, surface: &S, model: &SpeedModel) -> CostedSegment
where
    S: ElevationSurface + ?Sized,
{
    let length_km = segment_length_km(&segment.geometry);
    let gradient_pct = match segment_gradient(&segment.geometry, length_km, surface) {
        Ok(gradient) => Some(gradient),
        Err(e) => {
            log::trace!("Segment {} has no gradient: {e}", segment.id);
            None
        }
    };
    let speed_kmh = gradient_pct.map(|g| model.speed_for_gradient(g));
    let time_min = speed_kmh.map(|speed| travel_time(length_km, speed));

    CostedSegment {
        segment: segment.clone(),
        length_km,
        gradient_pct,
        speed_kmh,
        time_min,
        suitability: classify(&segment.tags),
    }
}

/// Geodesic length of a line in kilometers
pub fn segment_length_km(geometry: &LineString<f64>) -> Kilometers {
    Haversine.length(geometry) / 1000.0
}

/// Minutes needed to cover `length_km` at `speed_kmh`
pub fn travel_time(length_km: Kilometers, speed_kmh: KmPerHour) -> Minutes {
    length_km / speed_kmh * 60.0
}

/// Average gradient in percent, travelling from the first to the last vertex.
///
/// Reverse traversal has the same magnitude with the opposite sign. The graph
/// is undirected, so the forward value is used as the segment's single
/// representative gradient.
pub fn segment_gradient<S>(
    geometry: &LineString<f64>,
    length_km: Kilometers,
    surface: &S,
) -> Result<f64, Error>
where
    S: ElevationSurface + ?Sized,
{
    let (Some(start), Some(end)) = (geometry.0.first(), geometry.0.last()) else {
        return Err(Error::GeometryError("segment without vertices".to_string()));
    };
    let rise = surface.elevation_at(*end)? - surface.elevation_at(*start)?;
    let run = length_km * 1000.0;

    if run > 0.0 {
        Ok(rise / run * 100.0)
    } else {
        Ok(0.0)
    }
}
