//! Velocity fade configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};

/// Decay law for the repulsion velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VelocityFadeMode {
    /// `exp(-rate * elapsed / fade_duration)`
    TimeBased,
    /// `exp(-rate * traveled / fade_distance)`
    DistanceBased,
    /// Whichever of the two decays faster
    #[default]
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct VelocityFadeConfig {
    /// Seconds (time-based scale)
    pub fade_duration: f32,
    /// Meters (distance-based scale)
    pub fade_distance: f32,
    /// Exponent multiplier; higher fades faster
    pub decay_rate: f32,
    /// Speeds below this snap to zero
    pub velocity_epsilon: f32,
    pub fade_mode: VelocityFadeMode,
    /// Extra linear drag per second, 0 disables
    pub drag_coefficient: f32,
}

impl Default for VelocityFadeConfig {
    fn default() -> Self {
        Self {
            fade_duration: 1.0,
            fade_distance: 0.2,
            decay_rate: 3.0,
            velocity_epsilon: 0.001,
            fade_mode: VelocityFadeMode::Hybrid,
            drag_coefficient: 0.0,
        }
    }
}

impl VelocityFadeConfig {
    /// Pure time decay.
    pub fn time_based(fade_duration: f32, decay_rate: f32) -> Self {
        Self { fade_mode: VelocityFadeMode::TimeBased, fade_duration, decay_rate, ..Self::default() }
    }

    /// Pure distance decay.
    pub fn distance_based(fade_distance: f32, decay_rate: f32) -> Self {
        Self {
            fade_mode: VelocityFadeMode::DistanceBased,
            fade_distance,
            decay_rate,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("velocity.fade_duration", self.fade_duration)?;
        ensure_positive("fade_distance", self.fade_distance)?;
        ensure_non_negative("decay_rate", self.decay_rate)?;
        ensure_positive("velocity_epsilon", self.velocity_epsilon)?;
        ensure_non_negative("drag_coefficient", self.drag_coefficient)?;
        if self.decay_rate == 0.0 && self.drag_coefficient == 0.0 {
            return Err(ConfigError::NoVelocityDecay {
                decay_rate: self.decay_rate,
                drag_coefficient: self.drag_coefficient,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = VelocityFadeConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.fade_mode, VelocityFadeMode::Hybrid);
        assert!((c.decay_rate - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_drag_rejected() {
        let c = VelocityFadeConfig { drag_coefficient: -1.0, ..Default::default() };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Negative { field: "drag_coefficient", .. })
        ));
    }

    #[test]
    fn test_needs_some_decay() {
        let frozen =
            VelocityFadeConfig { decay_rate: 0.0, drag_coefficient: 0.0, ..Default::default() };
        let err = frozen.validate().unwrap_err();
        assert!(matches!(err, ConfigError::NoVelocityDecay { .. }));
        assert!(err.is_validation());

        let drag_only =
            VelocityFadeConfig { decay_rate: 0.0, drag_coefficient: 2.0, ..Default::default() };
        assert!(drag_only.validate().is_ok());
        assert!(VelocityFadeConfig::time_based(1.0, 0.5).validate().is_ok());
    }

    #[test]
    fn test_constructors_pick_mode() {
        assert_eq!(VelocityFadeConfig::time_based(1.0, 3.0).fade_mode, VelocityFadeMode::TimeBased);
        assert_eq!(
            VelocityFadeConfig::distance_based(0.2, 3.0).fade_mode,
            VelocityFadeMode::DistanceBased
        );
    }
}
