//! Approach distance thresholds.
//!
//! All distances are meters measured from the obstacle *surface*, not its
//! center. Zones nest from the surface outward:
//!
//! ```text
//!   surface | contact | recovering | approaching | detected | idle
//!           0       epsilon      minimum       warning    detection
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::proximity::Zone;

/// Zone thresholds around an obstacle.
///
/// Invariant (checked by [`ApproachParameters::validate`]):
/// `0 < approach_epsilon < approach_minimum < warning_distance < detection_radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ApproachParameters {
    /// Contact trigger distance (default 4cm)
    pub approach_epsilon: f32,
    /// Agent must retreat beyond this to count as recovered (default 15cm)
    pub approach_minimum: f32,
    /// Early warning band (default 25cm)
    pub warning_distance: f32,
    /// Outer query boundary (default 1m)
    pub detection_radius: f32,
}

impl Default for ApproachParameters {
    fn default() -> Self {
        Self {
            approach_epsilon: 0.04,
            approach_minimum: 0.15,
            warning_distance: 0.25,
            detection_radius: 1.0,
        }
    }
}

impl ApproachParameters {
    /// Build and validate in one step.
    pub fn new(
        approach_epsilon: f32,
        approach_minimum: f32,
        warning_distance: f32,
        detection_radius: f32,
    ) -> Result<Self> {
        let params =
            Self { approach_epsilon, approach_minimum, warning_distance, detection_radius };
        params.validate()?;
        Ok(params)
    }

    /// Build from centimeter values (converted to meters) and validate.
    pub fn from_centimeters(
        epsilon_cm: f32,
        minimum_cm: f32,
        warning_cm: f32,
        detection_cm: f32,
    ) -> Result<Self> {
        Self::new(epsilon_cm / 100.0, minimum_cm / 100.0, warning_cm / 100.0, detection_cm / 100.0)
    }

    /// Tight tolerances for small agents.
    pub fn small_agent() -> Self {
        Self {
            approach_epsilon: 0.02,
            approach_minimum: 0.08,
            warning_distance: 0.15,
            detection_radius: 0.5,
        }
    }

    /// Generous spacing for large agents.
    pub fn large_agent() -> Self {
        Self {
            approach_epsilon: 0.08,
            approach_minimum: 0.25,
            warning_distance: 0.50,
            detection_radius: 2.0,
        }
    }

    /// Easy-to-trigger thresholds for demos.
    pub fn sensitive() -> Self {
        Self {
            approach_epsilon: 0.10,
            approach_minimum: 0.30,
            warning_distance: 0.60,
            detection_radius: 1.5,
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "small_agent" => Ok(Self::small_agent()),
            "large_agent" => Ok(Self::large_agent()),
            "sensitive" => Ok(Self::sensitive()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    /// Check the strict threshold ordering.
    pub fn validate(&self) -> Result<()> {
        if !(self.approach_epsilon.is_finite() && self.approach_epsilon > 0.0) {
            return Err(ConfigError::NonPositiveEpsilon { epsilon: self.approach_epsilon });
        }
        let ordered = [
            ("approach_epsilon", self.approach_epsilon),
            ("approach_minimum", self.approach_minimum),
            ("warning_distance", self.warning_distance),
            ("detection_radius", self.detection_radius),
        ];
        for pair in ordered.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            // `!(upper > lower)` also rejects NaN
            if !(upper > lower) {
                return Err(ConfigError::ThresholdOrder { lower_name, lower, upper_name, upper });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Zone for a surface distance, testing thresholds in ascending order.
    pub fn zone_for(&self, distance: f32) -> Zone {
        if distance <= self.approach_epsilon {
            Zone::Contact
        } else if distance <= self.approach_minimum {
            Zone::Recovering
        } else if distance <= self.warning_distance {
            Zone::Approaching
        } else if distance <= self.detection_radius {
            Zone::Detected
        } else {
            Zone::Idle
        }
    }

    /// Thresholds in centimeters, for display.
    pub fn to_centimeters(&self) -> [(&'static str, f32); 4] {
        [
            ("approach_epsilon_cm", self.approach_epsilon * 100.0),
            ("approach_minimum_cm", self.approach_minimum * 100.0),
            ("warning_distance_cm", self.warning_distance * 100.0),
            ("detection_radius_cm", self.detection_radius * 100.0),
        ]
    }
}
