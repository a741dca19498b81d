//! Four-condition completion gate.
//!
//! Recomputed from scratch every frame; it holds no memory of earlier frames
//! apart from the rest tolerance.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contact::{ApproachTrackerStatus, ColorEffectStatus, SurfacePoint, VelocityFadeStatus};

/// One completion condition, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryCondition {
    /// Agent beyond `approach_minimum` of the current surface pose
    DistanceCleared,
    /// Color back to normal
    ColorNormal,
    /// Repulsion velocity faded out
    VelocityStopped,
    /// Obstacle surface back at rest
    ObstacleAtRest,
}

impl RecoveryCondition {
    pub const ALL: [RecoveryCondition; 4] = [
        RecoveryCondition::DistanceCleared,
        RecoveryCondition::ColorNormal,
        RecoveryCondition::VelocityStopped,
        RecoveryCondition::ObstacleAtRest,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RecoveryCondition::DistanceCleared => "Distance",
            RecoveryCondition::ColorNormal => "Color",
            RecoveryCondition::VelocityStopped => "Velocity",
            RecoveryCondition::ObstacleAtRest => "Obstacle",
        }
    }
}

impl fmt::Display for RecoveryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryCompletionStatus {
    pub distance_cleared: bool,
    pub color_normal: bool,
    /// True while no velocity was ever applied
    pub velocity_stopped: bool,
    /// True while no deflection was ever recorded
    pub obstacle_at_rest: bool,
    /// Deflection (m) still counted as at rest
    pub rest_tolerance: f32,
}

impl Default for RecoveryCompletionStatus {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl RecoveryCompletionStatus {
    pub fn new(rest_tolerance: f32) -> Self {
        Self {
            distance_cleared: false,
            color_normal: false,
            velocity_stopped: true,
            obstacle_at_rest: true,
            rest_tolerance,
        }
    }

    /// Fresh evaluation of all four conditions.
    #[must_use]
    pub fn compute(
        &self,
        tracker: &ApproachTrackerStatus,
        color: &ColorEffectStatus,
        velocity: &VelocityFadeStatus,
        surface: &SurfacePoint,
    ) -> Self {
        Self {
            distance_cleared: tracker.check_threshold_crossed(),
            color_normal: color.is_normal(),
            velocity_stopped: velocity.is_stopped,
            obstacle_at_rest: surface.is_at_rest(self.rest_tolerance),
            rest_tolerance: self.rest_tolerance,
        }
    }

    pub fn is_met(&self, condition: RecoveryCondition) -> bool {
        match condition {
            RecoveryCondition::DistanceCleared => self.distance_cleared,
            RecoveryCondition::ColorNormal => self.color_normal,
            RecoveryCondition::VelocityStopped => self.velocity_stopped,
            RecoveryCondition::ObstacleAtRest => self.obstacle_at_rest,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.distance_cleared && self.color_normal && self.velocity_stopped && self.obstacle_at_rest
    }

    pub fn pending_conditions(&self) -> Vec<RecoveryCondition> {
        RecoveryCondition::ALL.into_iter().filter(|c| !self.is_met(*c)).collect()
    }

    /// First pending condition; `None` iff complete.
    pub fn blocking_condition(&self) -> Option<RecoveryCondition> {
        RecoveryCondition::ALL.into_iter().find(|c| !self.is_met(*c))
    }

    /// Share of met conditions, in quarters.
    pub fn completion_progress(&self) -> f32 {
        let met = RecoveryCondition::ALL.into_iter().filter(|c| self.is_met(*c)).count();
        met as f32 / 4.0
    }
}

impl fmt::Display for RecoveryCompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_complete() { "COMPLETE" } else { "PENDING" };
        write!(f, "Recovery {verdict} [")?;
        for (i, c) in RecoveryCondition::ALL.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", c.label(), if self.is_met(c) { "✓" } else { "✗" })?;
        }
        f.write_str("]")
    }
}
