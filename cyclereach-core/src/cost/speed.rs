use serde::{Deserialize, Serialize};

use crate::{Error, KmPerHour};

/// Gradient-adjusted cycling speed.
///
/// Downhill gradients add `downhill_gain` km/h per percent up to `max_speed`,
/// uphill gradients remove `uphill_loss` km/h per percent down to `min_speed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedModel {
    pub default_speed: KmPerHour,
    pub min_speed: KmPerHour,
    pub max_speed: KmPerHour,
    pub downhill_gain: f64,
    pub uphill_loss: f64,
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self {
            default_speed: 20.0,
            min_speed: 5.0,
            max_speed: 30.0,
            downhill_gain: 0.8,
            uphill_loss: 1.4,
        }
    }
}

impl SpeedModel {
    /// Speed for a gradient given in percent (negative is downhill)
    pub fn speed_for_gradient(&self, gradient_pct: f64) -> KmPerHour {
        if gradient_pct < 0.0 {
            (self.default_speed + self.downhill_gain * gradient_pct.abs()).min(self.max_speed)
        } else {
            (self.default_speed - self.uphill_loss * gradient_pct).max(self.min_speed)
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let speeds = [self.min_speed, self.default_speed, self.max_speed];
        if speeds.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(Error::Config(
                "speeds must be finite and positive".to_string(),
            ));
        }
        if !(self.min_speed <= self.default_speed && self.default_speed <= self.max_speed) {
            return Err(Error::Config(format!(
                "speed bounds must satisfy min ({}) <= default ({}) <= max ({})",
                self.min_speed, self.default_speed, self.max_speed
            )));
        }
        if !(self.downhill_gain >= 0.0 && self.uphill_loss >= 0.0) {
            return Err(Error::Config(
                "gradient factors must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_is_default_speed() {
        assert_eq!(SpeedModel::default().speed_for_gradient(0.0), 20.0);
    }

    #[test]
    fn downhill_is_faster_and_capped() {
        let model = SpeedModel::default();
        assert!((model.speed_for_gradient(-5.0) - 24.0).abs() < 1e-9);
        assert_eq!(model.speed_for_gradient(-40.0), 30.0);
    }

    #[test]
    fn uphill_is_slower_and_floored() {
        let model = SpeedModel::default();
        assert!((model.speed_for_gradient(5.0) - 13.0).abs() < 1e-9);
        assert_eq!(model.speed_for_gradient(25.0), 5.0);
    }

    #[test]
    fn speed_stays_within_bounds() {
        let model = SpeedModel::default();
        for step in -200..=200 {
            let speed = model.speed_for_gradient(f64::from(step) * 0.5);
            assert!((5.0..=30.0).contains(&speed), "speed {speed} out of bounds");
        }
    }

    #[test]
    fn rejects_inverted_bounds() {
        let model = SpeedModel {
            min_speed: 25.0,
            ..SpeedModel::default()
        };
        assert!(model.validate().is_err());
    }
}
