//! Repulsion force along the obstacle surface normal.
//!
//! Obstacles are vertical cylinders, so every normal here lies in the XZ
//! plane. Magnitude grows with penetration depth and approach speed and is
//! clamped to `[min_force, max_force]`.

use serde::{Deserialize, Serialize};

use crate::config::RepulsionConfig;
use crate::math::{horizontal_offset, Vec3, FALLBACK_DIRECTION};
use crate::proximity::ObstacleCylinder;

/// Below this horizontal offset the point is treated as on the axis.
const ON_AXIS: f32 = 1e-8;

/// Extra gap left outside the surface by [`corrected_position`].
pub const SAFETY_MARGIN: f32 = 0.01;

/// Outcome of a full [`calculate_repulsion`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepulsionResult {
    pub force: Vec3,
    pub magnitude: f32,
    pub surface_normal: Vec3,
    /// Agent position pushed just outside the surface
    pub corrected_position: Vec3,
    /// How far inside the surface the agent was, never negative
    pub penetration_depth: f32,
}

fn radial(center: &Vec3, point: &Vec3) -> Option<(Vec3, f32)> {
    let offset = horizontal_offset(center, point);
    let len = offset.norm();
    (len >= ON_AXIS).then(|| (offset / len, len))
}

/// Radial outward normal of a vertical cylinder at `contact_point`.
pub fn cylinder_surface_normal(contact_point: &Vec3, cylinder_center: &Vec3) -> Vec3 {
    radial(cylinder_center, contact_point).map_or(FALLBACK_DIRECTION, |(n, _)| n)
}

/// Surface normal and penetration depth (positive inside) for an agent.
///
/// An agent on the axis gets the fallback normal and a penetration equal to
/// the radius.
pub fn surface_normal_from_positions(agent: &Vec3, obstacle: &ObstacleCylinder) -> (Vec3, f32) {
    match radial(&obstacle.center, agent) {
        Some((normal, distance)) => (normal, obstacle.radius - distance),
        None => (FALLBACK_DIRECTION, obstacle.radius),
    }
}

/// Force vector along `surface_normal`.
///
/// Negative penetration or approach speed adds nothing.
pub fn compute_repulsion_force(
    surface_normal: &Vec3,
    penetration_depth: f32,
    approach_speed: f32,
    config: &RepulsionConfig,
) -> Vec3 {
    let mut magnitude = config.base_force;
    if penetration_depth > 0.0 {
        magnitude += penetration_depth * config.penetration_multiplier;
    }
    if approach_speed > 0.0 {
        magnitude += approach_speed * config.velocity_multiplier;
    }
    let magnitude = magnitude.min(config.max_force).max(config.min_force);
    *surface_normal * magnitude
}

/// Agent position moved radially to `radius + SAFETY_MARGIN`, height kept.
pub fn corrected_position(agent: &Vec3, obstacle: &ObstacleCylinder) -> Vec3 {
    let target = obstacle.radius + SAFETY_MARGIN;
    let normal = radial(&obstacle.center, agent).map_or(FALLBACK_DIRECTION, |(n, _)| n);
    Vec3::new(obstacle.center.x + normal.x * target, agent.y, obstacle.center.z + normal.z * target)
}

pub fn calculate_repulsion(
    agent: &Vec3,
    obstacle: &ObstacleCylinder,
    approach_speed: f32,
    config: &RepulsionConfig,
) -> RepulsionResult {
    let (surface_normal, penetration) = surface_normal_from_positions(agent, obstacle);
    let force = compute_repulsion_force(&surface_normal, penetration, approach_speed, config);
    RepulsionResult {
        force,
        magnitude: force.norm(),
        surface_normal,
        corrected_position: corrected_position(agent, obstacle),
        penetration_depth: penetration.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    fn post() -> ObstacleCylinder {
        ObstacleCylinder::new(vec3(0.0, 0.0, 0.0), 0.06)
    }

    #[test]
    fn test_normal_is_horizontal() {
        let n = cylinder_surface_normal(&vec3(0.0, 3.0, 2.0), &Vec3::zeros());
        assert_eq!(n, vec3(0.0, 0.0, 1.0));
        assert_eq!(cylinder_surface_normal(&vec3(0.0, 5.0, 0.0), &Vec3::zeros()), FALLBACK_DIRECTION);
    }

    #[test]
    fn test_penetration_sign() {
        let (n, p) = surface_normal_from_positions(&vec3(-0.05, 0.0, 0.0), &post());
        assert_eq!(n, vec3(-1.0, 0.0, 0.0));
        assert!((p - 0.01).abs() < 1e-6);
        let (_, outside) = surface_normal_from_positions(&vec3(0.1, 0.0, 0.0), &post());
        assert!(outside < 0.0);
        let (axis_n, axis_p) = surface_normal_from_positions(&Vec3::zeros(), &post());
        assert_eq!(axis_n, FALLBACK_DIRECTION);
        assert_eq!(axis_p, 0.06);
    }

    #[test]
    fn test_force_magnitude_terms_and_clamp() {
        let config = RepulsionConfig::default();
        let n = vec3(1.0, 0.0, 0.0);
        assert_eq!(compute_repulsion_force(&n, 0.0, 0.0, &config), vec3(100.0, 0.0, 0.0));
        assert_eq!(compute_repulsion_force(&n, -1.0, -4.0, &config), vec3(100.0, 0.0, 0.0));
        let f = compute_repulsion_force(&n, 5.0, 20.0, &config);
        assert!((f.x - 120.0).abs() < 1e-4);
        let capped = compute_repulsion_force(&n, 1000.0, 0.0, &config);
        assert_eq!(capped.x, config.max_force);
        let weak = RepulsionConfig { base_force: 1.0, ..config };
        assert_eq!(compute_repulsion_force(&n, 0.0, 0.0, &weak).x, weak.min_force);
    }

    #[test]
    fn test_multiplier_terms_ignore_base_force() {
        let n = vec3(1.0, 0.0, 0.0);
        let low = RepulsionConfig { base_force: 50.0, ..Default::default() };
        let high = RepulsionConfig { base_force: 200.0, ..Default::default() };
        let extra = |config: &RepulsionConfig| {
            compute_repulsion_force(&n, 4.0, 10.0, config).x - config.base_force
        };
        assert!((extra(&low) - 13.0).abs() < 1e-4);
        assert!((extra(&high) - 13.0).abs() < 1e-4);
    }

    #[test]
    fn test_corrected_position_outside_surface() {
        let p = corrected_position(&vec3(0.0, 1.5, 0.03), &post());
        assert!((p.z - 0.07).abs() < 1e-6);
        assert_eq!(p.y, 1.5);
        let on_axis = corrected_position(&vec3(0.0, 0.2, 0.0), &post());
        assert!((on_axis.x - 0.07).abs() < 1e-6);
    }

    #[test]
    fn test_full_calculation() {
        let r = calculate_repulsion(&vec3(0.05, 0.0, 0.0), &post(), 2.0, &RepulsionConfig::default());
        assert_eq!(r.surface_normal, vec3(1.0, 0.0, 0.0));
        assert!((r.penetration_depth - 0.01).abs() < 1e-6);
        assert!((r.magnitude - 101.02).abs() < 1e-3);
        assert!(r.corrected_position.x > post().radius);
    }
}
