//! Repulsion velocity decay.
//!
//! Decay always rescales the *initial* velocity by a factor derived from
//! elapsed time and/or distance traveled; the current velocity is never
//! multiplied frame over frame.

use serde::{Deserialize, Serialize};

use crate::config::{VelocityFadeConfig, VelocityFadeMode};
use crate::math::Vec3;

/// `v = F * dt / m`.
#[inline]
pub fn velocity_from_force(force: &Vec3, mass: f32, dt: f32) -> Vec3 {
    *force * (dt / mass)
}

/// 1.0 (full speed) down to 0.0 for the configured decay law. A non-positive
/// scale stops a single-law fade outright and is skipped in hybrid mode.
pub fn decay_factor(elapsed: f32, traveled: f32, config: &VelocityFadeConfig) -> f32 {
    let time_factor = || {
        (config.fade_duration > 0.0)
            .then(|| (-config.decay_rate * elapsed / config.fade_duration).exp())
    };
    let distance_factor = || {
        (config.fade_distance > 0.0)
            .then(|| (-config.decay_rate * traveled / config.fade_distance).exp())
    };
    match config.fade_mode {
        VelocityFadeMode::TimeBased => time_factor().unwrap_or(0.0),
        VelocityFadeMode::DistanceBased => distance_factor().unwrap_or(0.0),
        VelocityFadeMode::Hybrid => {
            time_factor().unwrap_or(1.0).min(distance_factor().unwrap_or(1.0))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityFadeStatus {
    pub velocity: Vec3,
    /// Set once by `apply_initial_velocity`
    pub initial_velocity: Vec3,
    pub elapsed_time: f32,
    pub distance_traveled: f32,
    pub is_active: bool,
    pub is_stopped: bool,
}

impl Default for VelocityFadeStatus {
    fn default() -> Self {
        Self {
            velocity: Vec3::zeros(),
            initial_velocity: Vec3::zeros(),
            elapsed_time: 0.0,
            distance_traveled: 0.0,
            is_active: false,
            is_stopped: true,
        }
    }
}

impl VelocityFadeStatus {
    /// Start a fade from `velocity`. A zero vector leaves it stopped.
    #[must_use]
    pub fn apply_initial_velocity(&self, velocity: Vec3) -> Self {
        let moving = velocity.norm() > 0.0;
        Self {
            velocity,
            initial_velocity: velocity,
            elapsed_time: 0.0,
            distance_traveled: 0.0,
            is_active: moving,
            is_stopped: !moving,
        }
    }

    /// Advance by `dt`. No-op once stopped or before any velocity was applied.
    #[must_use]
    pub fn update(&self, dt: f32, config: &VelocityFadeConfig) -> Self {
        if !self.is_active || self.is_stopped {
            return *self;
        }
        let elapsed_time = self.elapsed_time + dt;
        let distance_traveled = self.distance_traveled + self.speed() * dt;
        let mut velocity =
            self.initial_velocity * decay_factor(elapsed_time, distance_traveled, config);
        if config.drag_coefficient > 0.0 {
            velocity *= (1.0 - config.drag_coefficient * dt).max(0.0);
        }
        let stopped = velocity.norm() < config.velocity_epsilon;
        if stopped {
            velocity = Vec3::zeros();
        }
        Self {
            velocity,
            initial_velocity: self.initial_velocity,
            elapsed_time,
            distance_traveled,
            is_active: !stopped,
            is_stopped: stopped,
        }
    }

    /// Position change for this frame.
    #[inline]
    pub fn displacement(&self, dt: f32) -> Vec3 {
        self.velocity * dt
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    #[inline]
    pub fn initial_speed(&self) -> f32 {
        self.initial_velocity.norm()
    }

    /// Unit direction of travel, `None` when (nearly) still.
    pub fn direction(&self) -> Option<Vec3> {
        let speed = self.speed();
        (speed >= 1e-8).then(|| self.velocity / speed)
    }

    /// `1 - speed / initial_speed`; 1 once stopped, 0 before starting.
    pub fn fade_progress(&self, config: &VelocityFadeConfig) -> f32 {
        if self.is_stopped {
            return 1.0;
        }
        if !self.is_active {
            return 0.0;
        }
        let initial = self.initial_speed();
        if initial < config.velocity_epsilon {
            return 1.0;
        }
        1.0 - self.speed() / initial
    }

    pub fn is_moving(&self) -> bool {
        self.is_active && !self.is_stopped
    }

    #[must_use]
    pub fn reset(&self) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_velocity_from_force() {
        let v = velocity_from_force(&vec3(0.0, 10.0, 0.0), 1.0, 1.0 / 60.0);
        assert!(v.x.abs() < 1e-9);
        assert!((v.y - 1.0 / 6.0).abs() < 1e-6);
        let heavy = velocity_from_force(&vec3(4.0, 0.0, 0.0), 2.0, 0.5);
        assert!((heavy.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_is_stopped() {
        let s = VelocityFadeStatus::default();
        assert!(s.is_stopped);
        assert!(!s.is_active);
        assert_eq!(s.update(DT, &VelocityFadeConfig::default()), s);
        assert_eq!(s.fade_progress(&VelocityFadeConfig::default()), 1.0);
    }

    #[test]
    fn test_time_based_monotonic_and_stops_by_one_second() {
        // e^-3 * (1/6) is about 0.0083, under a 0.01 epsilon right at t = 1s
        let config =
            VelocityFadeConfig { velocity_epsilon: 0.01, ..VelocityFadeConfig::time_based(1.0, 3.0) };
        let mut s =
            VelocityFadeStatus::default().apply_initial_velocity(vec3(0.0, 1.0 / 6.0, 0.0));
        let mut last = s.speed();
        let mut stopped_at = None;
        for frame in 1..=120 {
            s = s.update(DT, &config);
            assert!(s.speed() <= last + 1e-7, "frame {frame}");
            last = s.speed();
            if s.is_stopped && stopped_at.is_none() {
                stopped_at = Some(frame as f32 * DT);
            }
        }
        let t = stopped_at.expect("fade should stop");
        assert!(t <= 1.0 + 1e-3, "stopped at {t}");
        assert_eq!(s.velocity, Vec3::zeros());
    }

    #[test]
    fn test_default_epsilon_small_push_stops_by_one_second() {
        let config = VelocityFadeConfig::time_based(1.0, 3.0);
        let mut s = VelocityFadeStatus::default().apply_initial_velocity(vec3(0.01, 0.0, 0.0));
        for _ in 0..60 {
            s = s.update(DT, &config);
        }
        assert!(s.is_stopped);
    }

    #[test]
    fn test_initial_velocity_preserved() {
        let config = VelocityFadeConfig::default();
        let v0 = vec3(1.0, 0.0, 0.5);
        let mut s = VelocityFadeStatus::default().apply_initial_velocity(v0);
        for _ in 0..10 {
            s = s.update(DT, &config);
            assert_eq!(s.initial_velocity, v0);
        }
        let factor = decay_factor(s.elapsed_time, s.distance_traveled, &config);
        assert!((s.velocity - v0 * factor).norm() < 1e-6);
    }

    #[test]
    fn test_distance_based_uses_travel() {
        let config = VelocityFadeConfig::distance_based(0.2, 3.0);
        let s = VelocityFadeStatus::default().apply_initial_velocity(vec3(1.0, 0.0, 0.0));
        let next = s.update(0.1, &config);
        // traveled = 1.0 * 0.1 using the pre-update speed
        assert!((next.distance_traveled - 0.1).abs() < 1e-6);
        assert!((next.speed() - (-1.5f32).exp()).abs() < 1e-5);
    }

    #[test]
    fn test_hybrid_takes_faster_decay() {
        let config = VelocityFadeConfig::default();
        let f = decay_factor(0.5, 0.01, &config);
        assert!((f - (-1.5f32).exp()).abs() < 1e-6);
        let f = decay_factor(0.01, 0.1, &config);
        assert!((f - (-1.5f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_scales() {
        let zero_time =
            VelocityFadeConfig { fade_duration: 0.0, ..VelocityFadeConfig::time_based(1.0, 3.0) };
        assert_eq!(decay_factor(0.1, 0.1, &zero_time), 0.0);
        let hybrid =
            VelocityFadeConfig { fade_duration: 0.0, fade_distance: 0.0, ..Default::default() };
        assert_eq!(decay_factor(0.1, 0.1, &hybrid), 1.0);
    }

    #[test]
    fn test_drag_only_when_positive() {
        let base = VelocityFadeConfig::time_based(1.0, 0.0);
        let dragged = VelocityFadeConfig { drag_coefficient: 30.0, ..base };
        let s = VelocityFadeStatus::default().apply_initial_velocity(vec3(1.0, 0.0, 0.0));
        assert!((s.update(DT, &base).speed() - 1.0).abs() < 1e-6);
        assert!((s.update(DT, &dragged).speed() - 0.5).abs() < 1e-5);
        let crushing = VelocityFadeConfig { drag_coefficient: 1000.0, ..base };
        assert!(s.update(DT, &crushing).is_stopped);
    }

    #[test]
    fn test_displacement_and_progress() {
        let config = VelocityFadeConfig::default();
        let s = VelocityFadeStatus::default().apply_initial_velocity(vec3(0.0, 0.0, 2.0));
        assert_eq!(s.displacement(0.5), vec3(0.0, 0.0, 1.0));
        assert_eq!(s.fade_progress(&config), 0.0);
        assert_eq!(s.direction(), Some(vec3(0.0, 0.0, 1.0)));
        let later = s.update(0.1, &config);
        let p = later.fade_progress(&config);
        assert!(p > 0.0 && p < 1.0);
        assert!(later.reset().is_stopped);
    }
}
