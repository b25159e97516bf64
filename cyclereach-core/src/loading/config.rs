use geo::Point;
use serde::{Deserialize, Serialize};

use crate::{Error, Kilometers, algo::Scenario, cost::SpeedModel};

/// WGS84 position given as longitude and latitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    fn validate(&self, name: &str) -> Result<(), Error> {
        if !(-180.0..=180.0).contains(&self.lon) || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::Config(format!(
                "{name} ({}, {}) is not a valid longitude/latitude pair",
                self.lon, self.lat
            )));
        }
        Ok(())
    }
}

/// Parameters of one accessibility analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Fixed origin of every query
    pub origin: Location,
    /// Center of the area of interest, the origin when omitted
    #[serde(default)]
    pub center: Option<Location>,
    /// Radius of the area of interest
    pub radius_km: Kilometers,
    #[serde(default)]
    pub speed: SpeedModel,
    /// Split segments at interior vertices shared with other segments
    #[serde(default)]
    pub split_shared_vertices: bool,
    pub scenarios: Vec<Scenario>,
}

impl AnalysisConfig {
    pub fn center(&self) -> Location {
        self.center.unwrap_or(self.origin)
    }

    /// Checks every parameter before any stage runs
    pub fn validate(&self) -> Result<(), Error> {
        self.origin.validate("origin")?;
        if let Some(center) = &self.center {
            center.validate("center")?;
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(Error::Config(format!(
                "radius_km must be positive, got {}",
                self.radius_km
            )));
        }
        self.speed.validate()?;

        if self.scenarios.is_empty() {
            return Err(Error::Config("at least one scenario is required".to_string()));
        }
        for scenario in &self.scenarios {
            scenario.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Suitability, SuitabilityFilter};

    const CONFIG: &str = r#"
        radius_km = 5.0
        split_shared_vertices = true

        [origin]
        lon = 13.40
        lat = 52.52

        [speed]
        default_speed = 18.0

        [[scenarios]]
        name = "unrestricted"
        time_threshold_min = 6.0

        [[scenarios]]
        name = "good infrastructure"
        time_threshold_min = 15.0
        suitability_filter = ["good", "medium"]
    "#;

    #[test]
    fn parses_toml() {
        let config: AnalysisConfig = toml::from_str(CONFIG).unwrap();
        config.validate().unwrap();

        assert_eq!(config.center(), Location::new(13.40, 52.52));
        assert_eq!(config.speed.default_speed, 18.0);
        assert_eq!(config.speed.max_speed, 30.0);
        assert!(config.split_shared_vertices);
        assert_eq!(config.scenarios[0].suitability_filter, SuitabilityFilter::all());
        assert_eq!(
            config.scenarios[1].suitability_filter,
            SuitabilityFilter::only(&[Suitability::Good, Suitability::Medium])
        );
    }

    #[test]
    fn rejects_missing_scenarios() {
        let mut config: AnalysisConfig = toml::from_str(CONFIG).unwrap();
        config.scenarios.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn rejects_invalid_origin() {
        let mut config: AnalysisConfig = toml::from_str(CONFIG).unwrap();
        config.origin = Location::new(200.0, 52.0);
        assert!(config.validate().is_err());
    }
}
