//! # Contact response
//!
//! Per-pair sub-states that run from the moment an agent touches an obstacle
//! until it has fully recovered:
//!
//! - [`ApproachTrackerStatus`]: distance to a surface that may still be moving
//! - [`ColorEffectStatus`]: shock color and its fade back to normal
//! - [`VelocityFadeStatus`]: repulsion velocity and its decay
//! - [`InputLockStatus`]: whether agent input is blocked
//!
//! Every status is a `Copy` value; operations return the next value instead
//! of mutating in place. The recovery orchestrator composes them.
//!
//! Helpers for turning raw physics contacts into [`ContactEvent`]s live in
//! [`filter`] and [`repulsion`].

pub mod approach_tracker;
pub mod color_effect;
pub mod color_fade;
pub mod filter;
pub mod input_lock;
pub mod repulsion;
pub mod surface;
pub mod velocity_fade;

pub use approach_tracker::{ApproachTrackerStatus, RecoveryPhase};
pub use color_effect::{ColorEffectState, ColorEffectStatus};
pub use color_fade::{fade_progress, FadeInputs};
pub use filter::{
    extract_contact_info, filter_contacts, ActorPatterns, ContactEvent, ContactInfo, RawContact,
    DEFAULT_AGENT_OFFSET,
};
pub use input_lock::{InputLockReason, InputLockStatus};
pub use repulsion::{calculate_repulsion, RepulsionResult};
pub use surface::SurfacePoint;
pub use velocity_fade::{velocity_from_force, VelocityFadeStatus};
