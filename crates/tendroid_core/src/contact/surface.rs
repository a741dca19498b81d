//! Obstacle surface reference point.

use serde::{Deserialize, Serialize};

use crate::math::{normalize_or, Vec3, FALLBACK_DIRECTION};

/// A point on the obstacle boundary with its deflected and rest poses.
///
/// The obstacle animation owns the motion; this core only reads the current
/// pose each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub current_position: Vec3,
    pub rest_position: Vec3,
    /// Unit normal pointing away from the obstacle
    pub outward_normal: Vec3,
}

impl Default for SurfacePoint {
    fn default() -> Self {
        Self::at_rest(Vec3::zeros(), FALLBACK_DIRECTION)
    }
}

impl SurfacePoint {
    /// Undeflected point. A zero normal falls back to `+X`.
    pub fn at_rest(position: Vec3, normal: Vec3) -> Self {
        Self {
            current_position: position,
            rest_position: position,
            outward_normal: normalize_or(&normal, FALLBACK_DIRECTION),
        }
    }

    /// Point pushed in by `deflection` at a contact; it rests `deflection`
    /// further out along the normal.
    ///
    /// A non-unit `normal` is normalized first; a zero normal falls back to `+X`.
    pub fn from_contact(contact_point: Vec3, normal: Vec3, deflection: f32) -> Self {
        let outward_normal = normalize_or(&normal, FALLBACK_DIRECTION);
        Self {
            current_position: contact_point,
            rest_position: contact_point + outward_normal * deflection,
            outward_normal,
        }
    }

    /// Same rest pose at a new current position; normal replaced when given.
    #[must_use]
    pub fn with_current(&self, current: Vec3, normal: Option<Vec3>) -> Self {
        Self {
            current_position: current,
            rest_position: self.rest_position,
            outward_normal: normal
                .map(|n| normalize_or(&n, self.outward_normal))
                .unwrap_or(self.outward_normal),
        }
    }

    /// Distance between current and rest pose.
    #[inline]
    pub fn deflection(&self) -> f32 {
        (self.current_position - self.rest_position).norm()
    }

    #[inline]
    pub fn is_at_rest(&self, tolerance: f32) -> bool {
        self.deflection() <= tolerance
    }

    /// 3D distance from `point` to the current pose.
    #[inline]
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        (*point - self.current_position).norm()
    }

    /// Distance along the normal; positive outside.
    #[inline]
    pub fn signed_distance_to(&self, point: &Vec3) -> f32 {
        (*point - self.current_position).dot(&self.outward_normal)
    }
}
