//! # tendroid_core - Agent/Obstacle Contact and Recovery Core
//!
//! Deterministic per-pair logic for agents brushing against flexible
//! obstacles: proximity zones, a five-state proximity machine, and the
//! contact → shock → recovery lifecycle with its four-condition completion
//! gate.
//!
//! ## Features
//! - Horizontal-plane proximity classification, single or batched on rayon
//! - Tracking against a surface that is itself springing back to rest
//! - Shock color, repulsion velocity decay and input lock as `Copy` values
//! - Typed event queue instead of callbacks
//! - Serde/YAML/JSON configuration validated once at construction
//!
//! ## Usage
//! ```rust
//! use tendroid_core::{vec3, RecoveryConfig, RecoveryOrchestrator, Vec3};
//!
//! let mut orchestrator = RecoveryOrchestrator::new(RecoveryConfig::default()).unwrap();
//! orchestrator.handle_contact(
//!     Vec3::zeros(),
//!     vec3(1.0, 0.0, 0.0),
//!     vec3(0.04, 0.0, 0.0),
//!     vec3(10.0, 0.0, 0.0),
//!     0.0,
//! );
//! assert!(orchestrator.is_input_locked());
//! let step = orchestrator.update(vec3(0.05, 0.0, 0.0), Vec3::zeros(), 1.0 / 60.0, None);
//! assert!(step.x > 0.0);
//! ```

// Physics-style entry points take positions, normals and forces separately
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod contact;
pub mod error;
pub mod math;
pub mod ports;
pub mod proximity;
pub mod recovery;

pub use config::{ApproachParameters, RecoveryConfig};
pub use error::{ConfigError, Result};
pub use math::{vec3, Color, Vec3};

// Re-export proximity types
pub use proximity::{
    determine_next_state, BatchProximityContext, ObstacleCylinder, PairKey, ProximityDetector,
    ProximityState, ProximityStateManager, Zone,
};

// Re-export contact sub-states
pub use contact::{
    ApproachTrackerStatus, ColorEffectStatus, ContactEvent, InputLockStatus, SurfacePoint,
    VelocityFadeStatus,
};

// Re-export recovery lifecycle
pub use recovery::{
    OrchestratorState, RecoveryCompletionStatus, RecoveryEvent, RecoveryOrchestrator,
    RecoverySupervisor,
};

pub use ports::{AgentPositionSource, InputGateSink, ObstacleSurfaceSource, VisualFeedbackSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
