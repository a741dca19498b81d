//! # Recovery
//!
//! Composes the contact sub-states into one lifecycle per pair:
//!
//! ```text
//! Idle ──contact──► Active ──gate complete──► Idle
//!                     ▲  │
//!                     └──┘ contact restarts
//! ```
//!
//! On contact the tracker starts, the color shocks, the repulsion velocity is
//! applied and input locks. Each frame the tracker, color and velocity
//! advance, then the four-condition [`RecoveryCompletionStatus`] decides
//! whether input unlocks.
//!
//! [`RecoveryOrchestrator`] handles one pair and queues [`RecoveryEvent`]s;
//! [`RecoverySupervisor`] owns many and ticks them on rayon.

pub mod completion;
pub mod events;
pub mod orchestrator;
pub mod state;
pub mod supervisor;

pub use completion::{RecoveryCompletionStatus, RecoveryCondition};
pub use events::RecoveryEvent;
pub use orchestrator::RecoveryOrchestrator;
pub use state::{FrameUpdate, OrchestratorPhase, OrchestratorState};
pub use supervisor::{PairFrame, PairTick, RecoverySupervisor};
