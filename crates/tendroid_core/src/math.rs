//! Geometry helpers shared by the proximity and contact modules.
//!
//! World space is Y-up. Zones and radial forces live in the XZ ground plane, so
//! most distances here ignore the Y component.

use nalgebra::Vector3;

/// World-space vector (meters, m/s, or N depending on context).
pub type Vec3 = Vector3<f32>;

/// Linear RGB color, each channel in 0..=1.
pub type Color = [f32; 3];

/// Horizontal lengths at or below this are treated as "on the axis".
pub const AXIS_EPSILON: f32 = 1e-4;

/// Direction used whenever a horizontal direction is undefined.
pub const FALLBACK_DIRECTION: Vec3 = Vec3::new(1.0, 0.0, 0.0);

#[inline]
pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

/// XZ-plane offset `to - from`, Y zeroed.
#[inline]
pub fn horizontal_offset(from: &Vec3, to: &Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z)
}

/// XZ-plane distance between two points.
#[inline]
pub fn horizontal_distance(a: &Vec3, b: &Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Unit XZ direction from `center` toward `point`.
///
/// Falls back to `+X` when `point` sits on the vertical axis through `center`.
#[inline]
pub fn horizontal_direction(center: &Vec3, point: &Vec3) -> Vec3 {
    let offset = horizontal_offset(center, point);
    let len = offset.norm();
    if len > AXIS_EPSILON {
        offset / len
    } else {
        FALLBACK_DIRECTION
    }
}

/// Normalize `v`, or return `fallback` for (near) zero-length input.
#[inline]
pub fn normalize_or(v: &Vec3, fallback: Vec3) -> Vec3 {
    let len = v.norm();
    if len > 1e-8 && len.is_finite() {
        *v / len
    } else {
        fallback
    }
}

/// Component-wise linear interpolation, `t` clamped to 0..=1.
#[inline]
pub fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    let t = clamp01(t);
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

/// Clamp to 0..=1; NaN maps to 0.
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let a = vec3(0.0, 0.0, 0.0);
        let b = vec3(3.0, 100.0, 4.0);
        assert!((horizontal_distance(&a, &b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_direction_fallback_on_axis() {
        let c = vec3(1.0, 0.0, 1.0);
        let p = vec3(1.0, 5.0, 1.0);
        assert_eq!(horizontal_direction(&c, &p), FALLBACK_DIRECTION);
    }

    #[test]
    fn test_horizontal_direction_is_unit() {
        let dir = horizontal_direction(&vec3(0.0, 0.0, 0.0), &vec3(0.0, 2.0, -3.0));
        assert!((dir.norm() - 1.0).abs() < 1e-6);
        assert!((dir.z + 1.0).abs() < 1e-6);
        assert_eq!(dir.y, 0.0);
    }

    #[test]
    fn test_lerp_color_clamps() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 0.5, 0.2];
        assert_eq!(lerp_color(a, b, -1.0), a);
        assert_eq!(lerp_color(a, b, 2.0), b);
        let mid = lerp_color(a, b, 0.5);
        assert!((mid[0] - 0.5).abs() < 1e-6);
        assert!((mid[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_or_zero_vector() {
        let v = normalize_or(&Vec3::zeros(), FALLBACK_DIRECTION);
        assert_eq!(v, FALLBACK_DIRECTION);
    }
}
