//! Collaborator interfaces.
//!
//! The core never owns agent or obstacle motion. The host feeds positions in
//! through the source traits and receives color and lock state through the
//! sinks. Plain values implement all four, which is enough for tests and the
//! CLI.

use crate::contact::SurfacePoint;
use crate::math::{Color, Vec3};

/// Current agent position, read once per frame.
pub trait AgentPositionSource {
    fn agent_position(&self) -> Vec3;
}

/// Current obstacle surface pose, read once per frame.
pub trait ObstacleSurfaceSource {
    fn surface_point(&self) -> SurfacePoint;

    /// Distance between current and rest pose.
    fn deflection(&self) -> f32 {
        self.surface_point().deflection()
    }
}

/// Receives the agent color after each frame.
pub trait VisualFeedbackSink {
    fn set_color(&mut self, color: Color);
}

/// Receives the input lock flag after each frame.
pub trait InputGateSink {
    fn set_input_locked(&mut self, locked: bool);
}

impl AgentPositionSource for Vec3 {
    fn agent_position(&self) -> Vec3 {
        *self
    }
}

impl ObstacleSurfaceSource for SurfacePoint {
    fn surface_point(&self) -> SurfacePoint {
        *self
    }
}

impl VisualFeedbackSink for Color {
    fn set_color(&mut self, color: Color) {
        *self = color;
    }
}

impl InputGateSink for bool {
    fn set_input_locked(&mut self, locked: bool) {
        *self = locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    #[test]
    fn test_value_impls() {
        let p = vec3(1.0, 2.0, 3.0);
        assert_eq!(p.agent_position(), p);

        let s = SurfacePoint::from_contact(Vec3::zeros(), vec3(1.0, 0.0, 0.0), 0.2);
        assert!((ObstacleSurfaceSource::deflection(&s) - 0.2).abs() < 1e-6);

        let mut color: Color = [0.0; 3];
        color.set_color([0.5, 0.5, 0.5]);
        assert_eq!(color, [0.5, 0.5, 0.5]);

        let mut locked = false;
        locked.set_input_locked(true);
        assert!(locked);
    }
}
