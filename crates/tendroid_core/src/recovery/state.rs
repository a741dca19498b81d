//! Per-pair orchestrator state and its pure frame transitions.
//!
//! `OrchestratorState` is a `Copy` value. [`OrchestratorState::handle_contact`]
//! and [`OrchestratorState::update_frame`] return a new value and never touch
//! anything outside it, so independent pairs can be advanced on any thread.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::completion::RecoveryCompletionStatus;
use crate::config::{ColorFadeSource, RecoveryConfig};
use crate::contact::{
    fade_progress, velocity_from_force, ApproachTrackerStatus, ColorEffectStatus, FadeInputs,
    InputLockReason, InputLockStatus, SurfacePoint, VelocityFadeStatus,
};
use crate::math::{Color, Vec3};
use crate::proximity::{determine_next_state, ProximityState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorPhase {
    #[default]
    Idle,
    /// Between a contact and the completion gate passing
    Active,
}

impl OrchestratorPhase {
    pub fn name(self) -> &'static str {
        match self {
            OrchestratorPhase::Idle => "IDLE",
            OrchestratorPhase::Active => "ACTIVE",
        }
    }
}

impl fmt::Display for OrchestratorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything one agent/obstacle pair needs to run a recovery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorState {
    pub phase: OrchestratorPhase,
    pub tracker: ApproachTrackerStatus,
    pub surface: SurfacePoint,
    pub proximity_state: ProximityState,
    pub previous_distance: Option<f32>,
    pub completion: RecoveryCompletionStatus,
    pub color: ColorEffectStatus,
    pub velocity: VelocityFadeStatus,
    pub input_lock: InputLockStatus,
    pub config: RecoveryConfig,
    pub total_contacts: u32,
    pub total_recoveries: u32,
    /// Frames since the last contact
    pub frames_active: u32,
    /// Seconds since the color started fading back
    pub color_fade_elapsed: f32,
}

/// Result of one [`OrchestratorState::update_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    pub state: OrchestratorState,
    /// Agent displacement for this frame
    pub displacement: Vec3,
    /// Set with the surface distance on the frame color recovery starts
    pub color_recovery_started: Option<f32>,
    pub completed: bool,
}

impl Default for OrchestratorState {
    fn default() -> Self {
        Self::new(RecoveryConfig::default())
    }
}

impl OrchestratorState {
    /// Idle state for `config`. The config is assumed validated.
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            phase: OrchestratorPhase::Idle,
            tracker: ApproachTrackerStatus::inactive(config.approach.approach_minimum),
            surface: SurfacePoint::default(),
            proximity_state: ProximityState::Idle,
            previous_distance: None,
            completion: RecoveryCompletionStatus::new(config.orchestrator.rest_tolerance),
            color: ColorEffectStatus::normal(&config.color),
            velocity: VelocityFadeStatus::default(),
            input_lock: InputLockStatus::default(),
            config,
            total_contacts: 0,
            total_recoveries: 0,
            frames_active: 0,
            color_fade_elapsed: 0.0,
        }
    }

    /// Start (or restart) a recovery from a contact.
    ///
    /// The surface is taken to be pushed in by `deflection` and will return
    /// outward along `surface_normal`.
    #[must_use]
    pub fn handle_contact(
        &self,
        contact_point: Vec3,
        surface_normal: Vec3,
        agent: Vec3,
        repulsion_force: Vec3,
        deflection: f32,
    ) -> Self {
        let params = &self.config.approach;
        let surface = SurfacePoint::from_contact(contact_point, surface_normal, deflection);
        let initial_distance = surface.distance_to(&agent);
        let (proximity_state, _) =
            determine_next_state(ProximityState::Contact, initial_distance, None, params);
        let initial_velocity = velocity_from_force(
            &repulsion_force,
            self.config.orchestrator.agent_mass,
            self.config.orchestrator.impulse_dt,
        );
        Self {
            phase: OrchestratorPhase::Active,
            tracker: self.tracker.start_tracking(params.approach_minimum, initial_distance),
            surface,
            proximity_state,
            previous_distance: Some(initial_distance),
            completion: RecoveryCompletionStatus::new(self.config.orchestrator.rest_tolerance),
            color: self.color.trigger_shock(&self.config.color),
            velocity: self.velocity.apply_initial_velocity(initial_velocity),
            input_lock: self.input_lock.lock_input_on_contact(),
            total_contacts: self.total_contacts + 1,
            frames_active: 0,
            color_fade_elapsed: 0.0,
            ..*self
        }
    }

    /// Advance one frame. Idle states come back unchanged with zero
    /// displacement.
    ///
    /// Order: surface pose and tracker, color, velocity, completion gate,
    /// then input lock. The displacement uses the velocity held over the
    /// frame, before this frame's decay.
    ///
    /// The frame that crosses the recovery threshold also applies color
    /// progress. With [`ColorFadeSource::TrackerProgress`] that progress is
    /// already 1, so the color lands on normal in the same frame.
    pub fn update_frame(
        &self,
        agent: Vec3,
        surface_position: Vec3,
        dt: f32,
        surface_normal: Option<Vec3>,
    ) -> FrameUpdate {
        if self.phase == OrchestratorPhase::Idle {
            return FrameUpdate {
                state: *self,
                displacement: Vec3::zeros(),
                color_recovery_started: None,
                completed: false,
            };
        }
        let config = &self.config;

        let surface = self.surface.with_current(surface_position, surface_normal);
        let distance = surface.distance_to(&agent);
        let tracker = self.tracker.update_distance(&agent, &surface);
        let (proximity_state, _) = determine_next_state(
            self.proximity_state,
            distance,
            self.previous_distance,
            &config.approach,
        );

        let mut color = self.color;
        let mut color_fade_elapsed = self.color_fade_elapsed;
        let mut color_recovery_started = None;
        if color.is_shocked() && tracker.check_threshold_crossed() {
            color = color.start_recovery();
            color_fade_elapsed = 0.0;
            color_recovery_started = Some(distance);
        } else if color.is_recovering() {
            color_fade_elapsed += dt;
        }
        if color.is_recovering() {
            let progress = match config.orchestrator.color_fade_source {
                ColorFadeSource::TrackerProgress => tracker.recovery_progress(),
                ColorFadeSource::FadeStrategy => fade_progress(
                    &config.fade,
                    FadeInputs { distance, speed: self.velocity.speed(), elapsed: color_fade_elapsed },
                ),
            };
            color = color.update_recovery(progress, &config.color);
        }

        let displacement = self.velocity.displacement(dt);
        let velocity = self.velocity.update(dt, &config.velocity);

        let completion = self.completion.compute(&tracker, &color, &velocity, &surface);

        let mut next = Self {
            tracker,
            surface,
            proximity_state,
            previous_distance: Some(distance),
            completion,
            color,
            velocity,
            frames_active: self.frames_active + 1,
            color_fade_elapsed,
            ..*self
        };
        let completed = completion.is_complete();
        if completed {
            next.input_lock = next.input_lock.unlock_input_on_recovery_complete();
            next.tracker = next.tracker.complete_recovery();
            next.proximity_state = ProximityState::Recovered;
            next.total_recoveries += 1;
            next.phase = OrchestratorPhase::Idle;
        } else if next.input_lock.is_locked {
            next.input_lock = next.input_lock.update_lock_reason(InputLockReason::Recovering);
        }

        FrameUpdate { state: next, displacement, color_recovery_started, completed }
    }

    /// Idle again with the same config; counters cleared.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::new(self.config)
    }

    pub fn is_active(&self) -> bool {
        self.phase == OrchestratorPhase::Active
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_lock.is_locked
    }

    pub fn current_color(&self) -> Color {
        self.color.current_color
    }

    /// One-line debug summary.
    pub fn status_summary(&self) -> String {
        let input = if self.input_lock.is_locked {
            format!("LOCKED ({})", self.input_lock.reason_name())
        } else {
            "UNLOCKED".to_string()
        };
        format!(
            "Recovery: {} | Input: {} | Color: {} | Velocity: {:.3} m/s | {} | Stats: {} contacts, {} recoveries",
            self.phase,
            input,
            self.color.state,
            self.velocity.speed(),
            self.completion,
            self.total_contacts,
            self.total_recoveries,
        )
    }
}
