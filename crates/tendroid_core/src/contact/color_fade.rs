//! Fade progress strategies for color recovery.
//!
//! Every function returns 0 (shock color) to 1 (normal color). The color
//! state machine does not care which strategy produced the value.

use serde::{Deserialize, Serialize};

use crate::config::{FadeConfig, FadeMode};
use crate::math::clamp01;

/// Progress from distance: 0 at `fade_start_distance`, 1 at `fade_end_distance`.
pub fn distance_fade(distance: f32, config: &FadeConfig) -> f32 {
    let start = config.fade_start_distance;
    let end = config.fade_end_distance;
    if distance <= start {
        0.0
    } else if distance >= end {
        1.0
    } else {
        (distance - start) / (end - start)
    }
}

/// Progress from speed: 0 at `max_speed` and above, 1 at `min_speed` and below.
pub fn speed_fade(speed: f32, config: &FadeConfig) -> f32 {
    if speed >= config.max_speed {
        0.0
    } else if speed <= config.min_speed {
        1.0
    } else {
        1.0 - (speed - config.min_speed) / (config.max_speed - config.min_speed)
    }
}

/// Linear progress over `fade_duration` seconds.
pub fn time_fade(elapsed: f32, config: &FadeConfig) -> f32 {
    if elapsed <= 0.0 {
        0.0
    } else if elapsed >= config.fade_duration {
        1.0
    } else {
        elapsed / config.fade_duration
    }
}

/// Weighted mix; `distance_weight` clamped to 0..=1, speed gets the rest.
pub fn blend_fade(distance_progress: f32, speed_progress: f32, distance_weight: f32) -> f32 {
    let w = clamp01(distance_weight);
    distance_progress * w + speed_progress * (1.0 - w)
}

/// Inputs a strategy may read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FadeInputs {
    pub distance: f32,
    pub speed: f32,
    pub elapsed: f32,
}

/// Progress for the configured mode, eased.
pub fn fade_progress(config: &FadeConfig, inputs: FadeInputs) -> f32 {
    let raw = match config.mode {
        FadeMode::Distance => distance_fade(inputs.distance, config),
        FadeMode::Speed => speed_fade(inputs.speed, config),
        FadeMode::Time => time_fade(inputs.elapsed, config),
        FadeMode::Blend => blend_fade(
            distance_fade(inputs.distance, config),
            speed_fade(inputs.speed, config),
            config.distance_weight,
        ),
    };
    config.easing.apply(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorConfig, Easing};
    use crate::contact::ColorEffectStatus;

    #[test]
    fn test_distance_fade_midpoint_gives_halfway_color() {
        let fade = FadeConfig::distance(6.0, 15.0);
        let progress = distance_fade(10.5, &fade);
        assert!((progress - 0.5).abs() < 1e-6);

        let colors = ColorConfig::default();
        let status = ColorEffectStatus::normal(&colors)
            .trigger_shock(&colors)
            .start_recovery()
            .update_recovery(progress, &colors);
        for i in 0..3 {
            let halfway = (colors.shock_color[i] + colors.normal_color[i]) / 2.0;
            assert!((status.current_color[i] - halfway).abs() < 1e-6);
        }
    }

    #[test]
    fn test_distance_fade_bounds() {
        let fade = FadeConfig::distance(6.0, 15.0);
        assert_eq!(distance_fade(2.0, &fade), 0.0);
        assert_eq!(distance_fade(6.0, &fade), 0.0);
        assert_eq!(distance_fade(15.0, &fade), 1.0);
    }

    #[test]
    fn test_speed_fade() {
        let fade = FadeConfig { min_speed: 5.0, max_speed: 50.0, ..Default::default() };
        assert_eq!(speed_fade(60.0, &fade), 0.0);
        assert_eq!(speed_fade(1.0, &fade), 1.0);
        assert!((speed_fade(27.5, &fade) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_time_fade() {
        let fade = FadeConfig { fade_duration: 0.5, ..Default::default() };
        assert_eq!(time_fade(0.0, &fade), 0.0);
        assert!((time_fade(0.25, &fade) - 0.5).abs() < 1e-6);
        assert_eq!(time_fade(0.9, &fade), 1.0);
    }

    #[test]
    fn test_blend_and_dispatch() {
        assert!((blend_fade(1.0, 0.0, 0.25) - 0.25).abs() < 1e-6);
        assert!((blend_fade(1.0, 0.0, 4.0) - 1.0).abs() < 1e-6);

        let fade = FadeConfig {
            mode: FadeMode::Blend,
            distance_weight: 0.5,
            ..FadeConfig::distance(0.0, 1.0)
        };
        let inputs = FadeInputs { distance: 1.0, speed: fade.max_speed, elapsed: 0.0 };
        assert!((fade_progress(&fade, inputs) - 0.5).abs() < 1e-6);

        let eased = FadeConfig { easing: Easing::EaseIn, ..FadeConfig::distance(0.0, 1.0) };
        let p = fade_progress(&eased, FadeInputs { distance: 0.5, ..Default::default() });
        assert!((p - 0.25).abs() < 1e-6);
    }
}
