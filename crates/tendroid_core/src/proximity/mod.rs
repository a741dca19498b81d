//! # Proximity
//!
//! Horizontal agent/obstacle distance, zone classification and the five-state
//! hysteretic proximity machine.
//!
//! - [`detector`]: stateless distance, zone and radial force
//! - [`batch`]: parallel batch detection through an owned thread pool
//! - [`hash_grid`]: XZ spatial hash for nearest-obstacle queries
//! - [`state`], [`transitions`]: proximity states and their transition rules
//! - [`state_manager`]: per-pair tracking with change events

pub mod batch;
pub mod detector;
pub mod hash_grid;
pub mod state;
pub mod state_manager;
pub mod transitions;

pub use batch::BatchProximityContext;
pub use detector::{ObstacleCylinder, ProximityDetector, ProximityResult};
pub use hash_grid::{NearestObstacle, SpatialHashGrid};
pub use state::ProximityState;
pub use state_manager::{PairKey, ProximityStateManager, StateChangeEvent, TrackedPair};
pub use transitions::{determine_next_state, MOVEMENT_THRESHOLD};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance band around an obstacle, innermost first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Contact,
    Recovering,
    Approaching,
    Detected,
    Idle,
}

impl Zone {
    pub const ALL: [Zone; 5] =
        [Zone::Contact, Zone::Recovering, Zone::Approaching, Zone::Detected, Zone::Idle];

    pub fn name(self) -> &'static str {
        match self {
            Zone::Contact => "contact",
            Zone::Recovering => "recovering",
            Zone::Approaching => "approaching",
            Zone::Detected => "detected",
            Zone::Idle => "idle",
        }
    }

    /// Index 0 (contact) through 4 (idle).
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_contact(self) -> bool {
        self == Zone::Contact
    }

    pub fn is_detected(self) -> bool {
        self != Zone::Idle
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
