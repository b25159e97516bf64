//! Geometry normalization: raw street features to simple line segments

use geo::{Coord, Geometry, LineString, MultiLineString};
use log::{debug, info, warn};

use super::AreaOfInterest;
use crate::{
    Error,
    model::{RoadSegment, Tags, tags::HIGHWAY},
};

/// Coordinates are rounded to this many degrees (OSM native precision), so
/// that equal endpoints compare equal after clipping.
const COORD_PRECISION: f64 = 1e7;

/// Raw street feature as delivered by the data source
#[derive(Debug, Clone, PartialEq)]
pub struct StreetFeature {
    pub geometry: Geometry<f64>,
    pub tags: Tags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizationStats {
    pub features_in: usize,
    /// Features with no part inside the area of interest
    pub features_outside: usize,
    /// Parts dropped because they collapsed to a point after clipping
    pub degenerate_parts: usize,
}

#[derive(Debug, Clone)]
pub struct NormalizedSegments {
    pub segments: Vec<RoadSegment>,
    pub stats: NormalizationStats,
}

/// Converts raw features into simple segments inside `area`.
///
/// Polygon features contribute their boundary rings, every feature is clipped
/// to the area and multi-part results are split into single lines.
///
/// # Errors
///
/// `DataError` for an empty collection or one where no feature carries a
/// `highway` tag; `GeometryError` for non-linear or non-finite geometry and
/// when nothing remains inside the area.
pub fn normalize_features(
    features: &[StreetFeature],
    area: &AreaOfInterest,
) -> Result<NormalizedSegments, Error> {
    if features.is_empty() {
        return Err(Error::DataError(
            "street feature collection is empty".to_string(),
        ));
    }
    if !features.iter().any(|f| f.tags.contains_key(HIGHWAY)) {
        return Err(Error::DataError(format!(
            "no street feature carries the required '{HIGHWAY}' tag"
        )));
    }

    let mut stats = NormalizationStats {
        features_in: features.len(),
        ..NormalizationStats::default()
    };
    let mut segments = Vec::new();

    for (index, feature) in features.iter().enumerate() {
        let lines = boundary_lines(&feature.geometry)
            .map_err(|e| Error::GeometryError(format!("feature {index}: {e}")))?;
        let clipped = area.clip(&lines);

        let before = segments.len();
        for part in clipped {
            match canonical_line(part) {
                Some(geometry) => segments.push(RoadSegment {
                    id: segments.len(),
                    feature: index,
                    geometry,
                    tags: feature.tags.clone(),
                }),
                None => stats.degenerate_parts += 1,
            }
        }
        if segments.len() == before {
            stats.features_outside += 1;
        }
    }

    if stats.degenerate_parts > 0 {
        warn!(
            "Dropped {} degenerate line parts after clipping",
            stats.degenerate_parts
        );
    }
    debug!(
        "{} features had no geometry inside the area of interest",
        stats.features_outside
    );

    if segments.is_empty() {
        return Err(Error::GeometryError(
            "no street geometry inside the area of interest".to_string(),
        ));
    }

    info!(
        "Normalized {} features into {} segments",
        stats.features_in,
        segments.len()
    );
    Ok(NormalizedSegments { segments, stats })
}

/// Linear parts of a geometry; polygons become their rings
fn boundary_lines(geometry: &Geometry<f64>) -> Result<MultiLineString<f64>, String> {
    let lines = match geometry {
        Geometry::Line(line) => vec![LineString::from(*line)],
        Geometry::LineString(ls) => vec![ls.clone()],
        Geometry::MultiLineString(mls) => mls.0.clone(),
        Geometry::Polygon(polygon) => polygon_rings(polygon),
        Geometry::MultiPolygon(mp) => mp.iter().flat_map(polygon_rings).collect(),
        Geometry::Rect(rect) => polygon_rings(&rect.to_polygon()),
        Geometry::Triangle(triangle) => polygon_rings(&triangle.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            let mut lines = Vec::new();
            for member in gc {
                lines.extend(boundary_lines(member)?.0);
            }
            lines
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {
            return Err("point geometry is not a street line".to_string());
        }
    };

    if lines
        .iter()
        .flat_map(|ls| ls.coords())
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err("geometry has non-finite coordinates".to_string());
    }
    Ok(MultiLineString::new(lines))
}

fn polygon_rings(polygon: &geo::Polygon<f64>) -> Vec<LineString<f64>> {
    std::iter::once(polygon.exterior().clone())
        .chain(polygon.interiors().iter().cloned())
        .collect()
}

/// Rounds coordinates and removes repeated vertices; `None` if the line
/// collapses to fewer than two distinct vertices.
fn canonical_line(line: LineString<f64>) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = line.into_iter().map(round_coord).collect();
    coords.dedup();
    (coords.len() >= 2).then(|| LineString::new(coords))
}

pub(crate) fn round_coord(c: Coord<f64>) -> Coord<f64> {
    // `+ 0.0` folds negative zero into zero
    Coord {
        x: (c.x * COORD_PRECISION).round() / COORD_PRECISION + 0.0,
        y: (c.y * COORD_PRECISION).round() / COORD_PRECISION + 0.0,
    }
}

#[cfg(test)]
mod tests {
    use geo::{MultiPoint, line_string, point, polygon};

    use super::*;

    fn area() -> AreaOfInterest {
        AreaOfInterest::circle(point!(x: 0.0, y: 0.0), 2.0).unwrap()
    }

    fn street(geometry: Geometry<f64>) -> StreetFeature {
        StreetFeature {
            geometry,
            tags: [("highway", "residential")].into_iter().collect(),
        }
    }

    #[test]
    fn empty_collection_is_data_error() {
        assert!(matches!(
            normalize_features(&[], &area()),
            Err(Error::DataError(_))
        ));
    }

    #[test]
    fn missing_highway_tag_is_data_error() {
        let feature = StreetFeature {
            geometry: line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)].into(),
            tags: Tags::new(),
        };
        assert!(matches!(
            normalize_features(&[feature], &area()),
            Err(Error::DataError(_))
        ));
    }

    #[test]
    fn points_are_geometry_errors() {
        let feature = street(MultiPoint::from(vec![(0.0, 0.0)]).into());
        assert!(matches!(
            normalize_features(&[feature], &area()),
            Err(Error::GeometryError(_))
        ));
    }

    #[test]
    fn polygon_becomes_boundary_line() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.001, y: 0.0),
            (x: 0.001, y: 0.001),
            (x: 0.0, y: 0.001),
        ];
        let result = normalize_features(&[street(square.into())], &area()).unwrap();
        assert!(!result.segments.is_empty());
        let corners = [(0.0, 0.0), (0.001, 0.0), (0.001, 0.001), (0.0, 0.001)];
        for (x, y) in corners {
            let found = result
                .segments
                .iter()
                .flat_map(|s| s.geometry.coords())
                .any(|c| (c.x - x).abs() < 1e-9 && (c.y - y).abs() < 1e-9);
            assert!(found, "corner ({x}, {y}) missing");
        }
    }

    #[test]
    fn multi_part_lines_are_split() {
        let mls = MultiLineString::new(vec![
            line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)],
            line_string![(x: 0.002, y: 0.0), (x: 0.003, y: 0.0)],
        ]);
        let result = normalize_features(&[street(mls.into())], &area()).unwrap();
        assert_eq!(result.segments.len(), 2);
        assert!(result.segments.iter().all(|s| s.feature == 0));
        assert_eq!(result.segments[1].id, 1);
    }

    #[test]
    fn outside_features_are_counted() {
        let inside = street(line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)].into());
        let outside = street(line_string![(x: 1.0, y: 1.0), (x: 1.001, y: 1.0)].into());
        let result = normalize_features(&[inside, outside], &area()).unwrap();
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.stats.features_outside, 1);
    }

    #[test]
    fn nothing_inside_is_geometry_error() {
        let outside = street(line_string![(x: 1.0, y: 1.0), (x: 1.001, y: 1.0)].into());
        assert!(matches!(
            normalize_features(&[outside], &area()),
            Err(Error::GeometryError(_))
        ));
    }

    #[test]
    fn collapsed_lines_are_dropped() {
        assert!(canonical_line(line_string![(x: 0.1, y: 0.1), (x: 0.1, y: 0.1)]).is_none());
        let kept = canonical_line(line_string![
            (x: 0.1, y: 0.1),
            (x: 0.100_000_000_01, y: 0.1),
            (x: 0.2, y: 0.1)
        ])
        .unwrap();
        assert_eq!(kept.0.len(), 2);
    }
}
