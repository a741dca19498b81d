//! Recovery orchestrator for one agent/obstacle pair.
//!
//! Wraps an [`OrchestratorState`] with an event queue and logging. The
//! orchestrator never writes positions; `update` returns the displacement for
//! the caller to apply.

use serde::{Deserialize, Serialize};

use super::events::RecoveryEvent;
use super::state::{FrameUpdate, OrchestratorPhase, OrchestratorState};
use crate::config::RecoveryConfig;
use crate::contact::{calculate_repulsion, ContactEvent, RepulsionResult, DEFAULT_AGENT_OFFSET};
use crate::error::Result;
use crate::math::{Color, Vec3};
use crate::ports::{AgentPositionSource, InputGateSink, ObstacleSurfaceSource, VisualFeedbackSink};
use crate::proximity::ObstacleCylinder;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecoveryOrchestrator {
    state: OrchestratorState,
    events: Vec<RecoveryEvent>,
}

impl RecoveryOrchestrator {
    /// Validates `config` once; later calls never re-check it.
    pub fn new(config: RecoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: RecoveryConfig) -> Self {
        Self { state: OrchestratorState::new(config), events: Vec::new() }
    }

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.state.config
    }

    pub fn phase(&self) -> OrchestratorPhase {
        self.state.phase
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_input_locked(&self) -> bool {
        self.state.is_input_locked()
    }

    pub fn current_color(&self) -> Color {
        self.state.current_color()
    }

    pub fn total_contacts(&self) -> u32 {
        self.state.total_contacts
    }

    pub fn total_recoveries(&self) -> u32 {
        self.state.total_recoveries
    }

    /// Begin recovery from a contact. A contact while already active restarts
    /// the recovery from the new contact.
    pub fn handle_contact(
        &mut self,
        contact_point: Vec3,
        surface_normal: Vec3,
        agent: Vec3,
        repulsion_force: Vec3,
        deflection: f32,
    ) {
        let restarted = self.state.is_active();
        self.state = self.state.handle_contact(
            contact_point,
            surface_normal,
            agent,
            repulsion_force,
            deflection,
        );
        tracing::debug!(
            restarted,
            distance = self.state.tracker.current_distance,
            speed = self.state.velocity.speed(),
            deflection,
            "contact handled"
        );
        self.events.push(RecoveryEvent::ContactHandled {
            contact_point,
            initial_distance: self.state.tracker.current_distance,
            initial_velocity: self.state.velocity.initial_velocity,
            total_contacts: self.state.total_contacts,
        });
    }

    /// [`handle_contact`](Self::handle_contact) from a physics contact: force
    /// from the impulse, agent estimated just off the contact point.
    pub fn handle_contact_event(&mut self, event: &ContactEvent) {
        self.handle_contact(
            event.contact_point,
            event.surface_normal,
            event.estimate_agent_position(DEFAULT_AGENT_OFFSET),
            event.force_from_impulse(),
            event.deflection(),
        );
    }

    /// [`handle_contact`](Self::handle_contact) against a cylinder obstacle.
    /// The push comes from the configured repulsion tuning; the contact point
    /// is the surface point facing the agent, at the agent's height.
    pub fn handle_obstacle_contact(
        &mut self,
        agent: Vec3,
        obstacle: &ObstacleCylinder,
        approach_speed: f32,
        deflection: f32,
    ) -> RepulsionResult {
        let repulsion = self.config().repulsion;
        let result = calculate_repulsion(&agent, obstacle, approach_speed, &repulsion);
        let normal = result.surface_normal;
        let contact_point = Vec3::new(
            obstacle.center.x + normal.x * obstacle.radius,
            agent.y,
            obstacle.center.z + normal.z * obstacle.radius,
        );
        tracing::trace!(
            magnitude = result.magnitude,
            penetration = result.penetration_depth,
            approach_speed,
            "obstacle repulsion"
        );
        self.handle_contact(contact_point, normal, agent, result.force, deflection);
        result
    }

    /// Advance one frame and return the agent displacement. Zero while idle
    /// or for a non-positive `dt`.
    pub fn update(
        &mut self,
        agent: Vec3,
        surface_position: Vec3,
        dt: f32,
        surface_normal: Option<Vec3>,
    ) -> Vec3 {
        if !self.state.is_active() {
            return Vec3::zeros();
        }
        if !(dt > 0.0 && dt.is_finite()) {
            tracing::warn!(dt, "ignoring frame with non-positive dt");
            return Vec3::zeros();
        }
        let FrameUpdate { state, displacement, color_recovery_started, completed } =
            self.state.update_frame(agent, surface_position, dt, surface_normal);
        self.state = state;

        if let Some(distance) = color_recovery_started {
            tracing::debug!(distance, "threshold cleared, color recovering");
            self.events.push(RecoveryEvent::ColorRecoveryStarted { distance });
        }
        if completed {
            tracing::info!(
                recoveries = state.total_recoveries,
                frames = state.frames_active,
                "recovery complete, input unlocked"
            );
            self.events.push(RecoveryEvent::RecoveryCompleted {
                total_recoveries: state.total_recoveries,
                frames: state.frames_active,
            });
        }
        displacement
    }

    /// Pull positions from the sources, advance, push color and lock to the
    /// sinks.
    pub fn tick<A, O, V, G>(
        &mut self,
        agent: &A,
        obstacle: &O,
        dt: f32,
        visual: &mut V,
        gate: &mut G,
    ) -> Vec3
    where
        A: AgentPositionSource + ?Sized,
        O: ObstacleSurfaceSource + ?Sized,
        V: VisualFeedbackSink + ?Sized,
        G: InputGateSink + ?Sized,
    {
        let surface = obstacle.surface_point();
        let displacement = self.update(
            agent.agent_position(),
            surface.current_position,
            dt,
            Some(surface.outward_normal),
        );
        visual.set_color(self.current_color());
        gate.set_input_locked(self.is_input_locked());
        displacement
    }

    /// Back to idle, dropping in-flight tracking and queued events.
    pub fn reset(&mut self) {
        self.state = self.state.reset();
        self.events.clear();
    }

    pub fn pending_events(&self) -> &[RecoveryEvent] {
        &self.events
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<RecoveryEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn status_summary(&self) -> String {
        self.state.status_summary()
    }
}
