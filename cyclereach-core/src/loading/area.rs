use geo::{
    BooleanOps, Contains, Coord, Destination as _, Haversine, Intersects, LineString, MultiLineString,
    Point, Polygon,
};
use log::info;

use crate::{Error, Kilometers, model::Destination};

const CIRCLE_VERTICES: usize = 64;

/// Circular buffer around a center point that confines every input
#[derive(Debug, Clone)]
pub struct AreaOfInterest {
    center: Point<f64>,
    radius_km: Kilometers,
    boundary: Polygon<f64>,
}

impl AreaOfInterest {
    /// Geodesic circle of `radius_km` around `center` (lon, lat)
    pub fn circle(center: Point<f64>, radius_km: Kilometers) -> Result<Self, Error> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(Error::Config(format!(
                "radius_km must be positive, got {radius_km}"
            )));
        }

        let radius_m = radius_km * 1000.0;
        let ring: Vec<Coord<f64>> = (0..CIRCLE_VERTICES)
            .map(|i| {
                let bearing = 360.0 * i as f64 / CIRCLE_VERTICES as f64;
                Haversine.destination(center, bearing, radius_m).into()
            })
            .collect();

        Ok(Self {
            center,
            radius_km,
            boundary: Polygon::new(LineString::new(ring), vec![]),
        })
    }

    pub fn center(&self) -> Point<f64> {
        self.center
    }

    pub fn radius_km(&self) -> Kilometers {
        self.radius_km
    }

    pub fn boundary(&self) -> &Polygon<f64> {
        &self.boundary
    }

    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.boundary.intersects(point)
    }

    /// Parts of `lines` that lie inside the buffer. Lines entirely inside
    /// are returned unchanged.
    pub fn clip(&self, lines: &MultiLineString<f64>) -> MultiLineString<f64> {
        lines
            .iter()
            .flat_map(|line| {
                if self.boundary.contains(line) {
                    vec![line.clone()]
                } else {
                    self.boundary
                        .clip(&MultiLineString::new(vec![line.clone()]), false)
                        .0
                }
            })
            .collect()
    }

    /// Keeps destinations inside the buffer, returns them with the number dropped
    pub fn retain_destinations(&self, destinations: Vec<Destination>) -> (Vec<Destination>, usize) {
        let total = destinations.len();
        let inside: Vec<Destination> = destinations
            .into_iter()
            .filter(|d| self.contains(&d.geometry))
            .collect();
        let outside = total - inside.len();
        info!(
            "{} of {total} destinations lie inside the area of interest",
            inside.len()
        );
        (inside, outside)
    }
}
