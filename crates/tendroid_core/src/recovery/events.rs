//! Typed orchestrator events.
//!
//! The orchestrator pushes these onto its own queue; callers drain it after
//! each frame.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecoveryEvent {
    /// A contact started (or restarted) recovery.
    ContactHandled {
        contact_point: Vec3,
        initial_distance: f32,
        initial_velocity: Vec3,
        total_contacts: u32,
    },
    /// The agent cleared the threshold; color started fading back.
    ColorRecoveryStarted { distance: f32 },
    /// All four conditions held; input unlocked.
    RecoveryCompleted { total_recoveries: u32, frames: u32 },
}

impl RecoveryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RecoveryEvent::ContactHandled { .. } => "contact_handled",
            RecoveryEvent::ColorRecoveryStarted { .. } => "color_recovery_started",
            RecoveryEvent::RecoveryCompleted { .. } => "recovery_completed",
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, RecoveryEvent::RecoveryCompleted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json() {
        let e = RecoveryEvent::RecoveryCompleted { total_recoveries: 2, frames: 40 };
        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["type"], "recovery_completed");
        assert_eq!(json["frames"], 40);
        assert!(e.is_completion());
        assert_eq!(RecoveryEvent::ColorRecoveryStarted { distance: 0.2 }.name(), "color_recovery_started");
    }
}
