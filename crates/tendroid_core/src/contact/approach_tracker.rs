//! Recovery distance tracking against a moving surface.
//!
//! After contact the obstacle springs back toward rest while the agent is
//! pushed away, so the reference point moves every frame. Distance is always
//! measured to the surface's *current* pose.
//!
//! ```text
//!   Inactive ──start──► Tracking ──d > threshold──► ThresholdCrossed ──complete──► Complete
//!      ▲                                                                              │
//!      └──────────────────────────────── reset ───────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::surface::SurfacePoint;
use crate::math::{clamp01, Vec3};
use crate::proximity::ProximityState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPhase {
    #[default]
    Inactive,
    Tracking,
    ThresholdCrossed,
    Complete,
}

impl RecoveryPhase {
    pub fn name(self) -> &'static str {
        match self {
            RecoveryPhase::Inactive => "INACTIVE",
            RecoveryPhase::Tracking => "TRACKING",
            RecoveryPhase::ThresholdCrossed => "THRESHOLD_CROSSED",
            RecoveryPhase::Complete => "COMPLETE",
        }
    }

    /// Closest proximity state for this phase.
    pub fn proximity_state(self) -> ProximityState {
        match self {
            RecoveryPhase::Inactive => ProximityState::Idle,
            RecoveryPhase::Tracking => ProximityState::Retreating,
            RecoveryPhase::ThresholdCrossed | RecoveryPhase::Complete => ProximityState::Recovered,
        }
    }
}

impl fmt::Display for RecoveryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracker value. Every operation returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApproachTrackerStatus {
    pub phase: RecoveryPhase,
    pub current_distance: f32,
    pub threshold_distance: f32,
    pub min_distance_recorded: f32,
    pub max_distance_recorded: f32,
    pub update_count: u32,
    pub recovery_count: u32,
}

impl Default for ApproachTrackerStatus {
    fn default() -> Self {
        Self::inactive(0.15)
    }
}

impl ApproachTrackerStatus {
    /// Idle tracker with the given threshold.
    pub fn inactive(threshold: f32) -> Self {
        Self {
            phase: RecoveryPhase::Inactive,
            current_distance: f32::INFINITY,
            threshold_distance: threshold,
            min_distance_recorded: f32::INFINITY,
            max_distance_recorded: 0.0,
            update_count: 0,
            recovery_count: 0,
        }
    }

    /// Begin a tracking session. Keeps `recovery_count`.
    #[must_use]
    pub fn start_tracking(&self, threshold: f32, initial_distance: f32) -> Self {
        Self {
            phase: RecoveryPhase::Tracking,
            current_distance: initial_distance,
            threshold_distance: threshold,
            min_distance_recorded: initial_distance,
            max_distance_recorded: initial_distance,
            update_count: 1,
            recovery_count: self.recovery_count,
        }
    }

    /// Record the agent's distance to the surface's current pose. Ignored
    /// unless `Tracking`.
    #[must_use]
    pub fn update_distance(&self, agent: &Vec3, surface: &SurfacePoint) -> Self {
        if self.phase != RecoveryPhase::Tracking {
            return *self;
        }
        let distance = surface.distance_to(agent);
        let phase = if distance > self.threshold_distance {
            RecoveryPhase::ThresholdCrossed
        } else {
            RecoveryPhase::Tracking
        };
        Self {
            phase,
            current_distance: distance,
            min_distance_recorded: self.min_distance_recorded.min(distance),
            max_distance_recorded: self.max_distance_recorded.max(distance),
            update_count: self.update_count + 1,
            ..*self
        }
    }

    /// Finalize a session and count it.
    #[must_use]
    pub fn complete_recovery(&self) -> Self {
        Self { phase: RecoveryPhase::Complete, recovery_count: self.recovery_count + 1, ..*self }
    }

    /// Back to `Inactive`, keeping threshold and `recovery_count`.
    #[must_use]
    pub fn reset_tracker(&self) -> Self {
        Self { recovery_count: self.recovery_count, ..Self::inactive(self.threshold_distance) }
    }

    /// True once the agent has been past the threshold this session.
    pub fn check_threshold_crossed(&self) -> bool {
        match self.phase {
            RecoveryPhase::ThresholdCrossed | RecoveryPhase::Complete => true,
            RecoveryPhase::Tracking => self.current_distance > self.threshold_distance,
            RecoveryPhase::Inactive => false,
        }
    }

    /// `(current - min) / (threshold - min)` clamped to 0..=1.
    pub fn recovery_progress(&self) -> f32 {
        match self.phase {
            RecoveryPhase::Inactive => 0.0,
            RecoveryPhase::Complete => 1.0,
            RecoveryPhase::Tracking | RecoveryPhase::ThresholdCrossed => {
                let min = self.min_distance_recorded;
                let needed = self.threshold_distance - min;
                if needed <= 0.0 {
                    return 1.0;
                }
                clamp01((self.current_distance - min) / needed)
            }
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.phase == RecoveryPhase::Tracking
    }

    pub fn is_complete(&self) -> bool {
        self.phase == RecoveryPhase::Complete
    }
}
