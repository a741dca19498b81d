//! Color feedback configuration.
//!
//! `ColorConfig` holds the two endpoint colors of the shock effect.
//! `FadeConfig` selects how recovery progress is measured while the color
//! blends from shock back to normal.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_color, ensure_non_negative, ensure_positive, ConfigError, Result};
use crate::math::{clamp01, Color};

/// Shock and normal colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ColorConfig {
    /// Resting color (cyan)
    pub normal_color: Color,
    /// Color applied on contact (red-orange)
    pub shock_color: Color,
    /// Distance (m) at which the direct shock exit fires
    pub approach_minimum: f32,
    /// Seconds for a time-driven fade back to normal
    pub recovery_duration: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            normal_color: [0.2, 0.8, 0.9],
            shock_color: [1.0, 0.3, 0.1],
            approach_minimum: 0.15,
            recovery_duration: 0.5,
        }
    }
}

impl ColorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_color("normal_color", self.normal_color)?;
        ensure_color("shock_color", self.shock_color)?;
        ensure_positive("color.approach_minimum", self.approach_minimum)?;
        ensure_positive("recovery_duration", self.recovery_duration)?;
        Ok(())
    }
}

/// What drives the shock → normal fade progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum FadeMode {
    /// Progress grows as the agent moves away from the surface
    #[default]
    Distance,
    /// Progress grows as the agent slows down
    Speed,
    /// Progress grows with elapsed time
    Time,
    /// Weighted mix of distance and speed
    Blend,
}

/// Easing curve applied to raw progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply the curve; `t` is clamped to 0..=1 first.
    pub fn apply(self, t: f32) -> f32 {
        let t = clamp01(t);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Fade strategy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FadeConfig {
    pub mode: FadeMode,
    pub easing: Easing,
    /// Distance where fading starts (progress 0)
    pub fade_start_distance: f32,
    /// Distance where fading completes (progress 1)
    pub fade_end_distance: f32,
    /// Speed at or above which progress is 0
    pub max_speed: f32,
    /// Speed at or below which progress is 1
    pub min_speed: f32,
    /// Seconds for the time mode
    pub fade_duration: f32,
    /// Distance share in blend mode (speed gets the rest)
    pub distance_weight: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            mode: FadeMode::Distance,
            easing: Easing::Linear,
            fade_start_distance: 0.04,
            fade_end_distance: 0.15,
            max_speed: 2.0,
            min_speed: 0.2,
            fade_duration: 0.5,
            distance_weight: 0.5,
        }
    }
}

impl FadeConfig {
    /// Distance-mode config over an explicit range.
    pub fn distance(fade_start_distance: f32, fade_end_distance: f32) -> Self {
        Self { mode: FadeMode::Distance, fade_start_distance, fade_end_distance, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.fade_end_distance > self.fade_start_distance) {
            return Err(ConfigError::EmptyRange {
                field: "fade distance",
                start: self.fade_start_distance,
                end: self.fade_end_distance,
            });
        }
        if !(self.max_speed > self.min_speed) {
            return Err(ConfigError::EmptyRange {
                field: "fade speed",
                start: self.min_speed,
                end: self.max_speed,
            });
        }
        ensure_non_negative("min_speed", self.min_speed)?;
        ensure_positive("fade.fade_duration", self.fade_duration)?;
        if !(0.0..=1.0).contains(&self.distance_weight) {
            return Err(ConfigError::Negative {
                field: "distance_weight",
                value: self.distance_weight,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_defaults_valid() {
        let c = ColorConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.shock_color, [1.0, 0.3, 0.1]);
    }

    #[test]
    fn test_color_out_of_range_rejected() {
        let c = ColorConfig { shock_color: [1.2, 0.0, 0.0], ..Default::default() };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ColorOutOfRange { field: "shock_color", index: 0, .. })
        ));
    }

    #[test]
    fn test_fade_defaults_valid() {
        assert!(FadeConfig::default().validate().is_ok());
        assert!(FadeConfig::distance(6.0, 15.0).validate().is_ok());
    }

    #[test]
    fn test_fade_empty_range_rejected() {
        let f = FadeConfig::distance(0.5, 0.5);
        assert!(matches!(f.validate(), Err(ConfigError::EmptyRange { .. })));
    }

    #[test]
    fn test_easing_endpoints() {
        for e in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!(e.apply(0.0).abs() < 1e-6, "{e:?}");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?}");
        }
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_fade_mode_serde_names() {
        let json = serde_json::to_string(&FadeMode::Blend).unwrap();
        assert_eq!(json, "\"blend\"");
        let e: Easing = serde_json::from_str("\"ease_in_out\"").unwrap();
        assert_eq!(e, Easing::EaseInOut);
    }
}
