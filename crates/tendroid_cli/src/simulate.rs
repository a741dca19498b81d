//! Scripted contact scenarios.
//!
//! One agent, one obstacle at the origin with its outward normal along +X.
//! Each frame the obstacle springs back toward rest, the orchestrator ticks
//! through its ports, and the agent moves by the returned displacement plus
//! an optional scripted retreat.
//!
//! Scenarios with an `obstacle_radius` treat the obstacle as a cylinder and
//! take the contact push from the config's repulsion tuning.

use anyhow::{bail, Result};
use serde::Serialize;
use tendroid_core::contact::SurfacePoint;
use tendroid_core::recovery::RecoveryCondition;
use tendroid_core::{
    vec3, Color, ObstacleCylinder, ObstacleSurfaceSource, RecoveryConfig, RecoveryEvent,
    RecoveryOrchestrator, Vec3,
};

const NORMAL: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// A scripted encounter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scenario {
    pub name: &'static str,
    /// Agent distance from the pushed-in surface at contact (m), negative inside
    pub start_distance: f32,
    /// Contact impulse along the normal
    pub impulse: f32,
    /// Cylinder radius (m); when set, the push comes from the config's
    /// repulsion tuning and `impulse` is unused
    pub obstacle_radius: Option<f32>,
    /// How far the contact pushed the surface in (m)
    pub deflection: f32,
    /// Fraction of the remaining deflection kept each frame
    pub settle: f32,
    /// Scripted retreat speed (m/s), 0 to hold still
    pub retreat_speed: f32,
    /// Retreat stops beyond this distance from rest (m)
    pub retreat_until: f32,
    /// Frame of an extra contact, if any
    pub second_contact: Option<u32>,
    pub max_frames: u32,
}

impl Scenario {
    /// Brush, back off, surface springs back quickly.
    pub const BUMP: Scenario = Scenario {
        name: "bump",
        start_distance: 0.03,
        impulse: 6.0,
        obstacle_radius: None,
        deflection: 0.02,
        settle: 0.8,
        retreat_speed: 0.3,
        retreat_until: 0.3,
        second_contact: None,
        max_frames: 600,
    };

    /// Contact and stay close; never recovers.
    pub const LINGER: Scenario = Scenario {
        name: "linger",
        retreat_speed: 0.0,
        impulse: 0.0,
        max_frames: 300,
        ..Self::BUMP
    };

    /// A second contact lands mid-recovery.
    pub const DOUBLE_TAP: Scenario =
        Scenario { name: "double_tap", second_contact: Some(20), ..Self::BUMP };

    /// Surface keeps input locked long after the agent has left.
    pub const STIFF_OBSTACLE: Scenario =
        Scenario { name: "stiff_obstacle", deflection: 0.05, settle: 0.995, ..Self::BUMP };

    /// Agent overlaps a thin post and is shoved clear by repulsion alone.
    pub const SHOVE: Scenario = Scenario {
        name: "shove",
        start_distance: -0.005,
        impulse: 0.0,
        obstacle_radius: Some(0.06),
        retreat_speed: 0.0,
        ..Self::BUMP
    };

    pub const ALL: [Scenario; 5] =
        [Self::BUMP, Self::LINGER, Self::DOUBLE_TAP, Self::STIFF_OBSTACLE, Self::SHOVE];

    pub fn from_name(name: &str) -> Result<Self> {
        match Self::ALL.into_iter().find(|s| s.name == name.to_lowercase()) {
            Some(scenario) => Ok(scenario),
            None => bail!(
                "Unknown scenario '{}' (expected one of: {})",
                name,
                Self::names().join(", ")
            ),
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.name).collect()
    }
}

/// Obstacle surface springing back to rest at the origin.
#[derive(Debug, Clone, Copy)]
struct SpringSurface {
    remaining: f32,
    settle: f32,
}

impl SpringSurface {
    fn push(&mut self, deflection: f32) {
        self.remaining = self.remaining.max(deflection);
    }

    fn step(&mut self) {
        self.remaining *= self.settle;
    }
}

impl ObstacleSurfaceSource for SpringSurface {
    fn surface_point(&self) -> SurfacePoint {
        SurfacePoint {
            current_position: -NORMAL * self.remaining,
            rest_position: Vec3::zeros(),
            outward_normal: NORMAL,
        }
    }
}

/// Per-frame trace line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u32,
    pub time: f32,
    pub agent_x: f32,
    pub distance: f32,
    pub speed: f32,
    pub deflection: f32,
    pub color_state: &'static str,
    pub color: Color,
    pub input_locked: bool,
    pub lock_reason: &'static str,
    pub blocking: Option<&'static str>,
    pub events: Vec<RecoveryEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub scenario: &'static str,
    pub frames: u32,
    pub contacts: u32,
    pub recoveries: u32,
    /// Frame of the last completed recovery
    pub recovered_at: Option<u32>,
    pub input_locked: bool,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub frames: Vec<FrameRecord>,
    pub summary: SimulationSummary,
}

/// Run `scenario` until it recovers with nothing left to script, or until
/// `max_frames`.
pub fn run_scenario(scenario: &Scenario, config: RecoveryConfig, dt: f32) -> Result<Simulation> {
    if !(dt > 0.0 && dt.is_finite()) {
        bail!("dt must be positive (got {dt})");
    }
    let mut orchestrator = RecoveryOrchestrator::new(config)?;
    let mut surface = SpringSurface { remaining: 0.0, settle: scenario.settle };
    let contact_point = -NORMAL * scenario.deflection;
    let mut agent = contact_point + NORMAL * scenario.start_distance;
    let mut color: Color = config.color.normal_color;
    let mut locked = false;
    let mut recovered_at = None;
    let mut frames = Vec::new();

    let touch = |orchestrator: &mut RecoveryOrchestrator, surface: &mut SpringSurface, at: Vec3| {
        surface.push(scenario.deflection);
        match scenario.obstacle_radius {
            Some(radius) => {
                let post = ObstacleCylinder::new(contact_point - NORMAL * radius, radius);
                let push =
                    orchestrator.handle_obstacle_contact(at, &post, 0.0, scenario.deflection);
                tracing::debug!(magnitude = push.magnitude, "repulsion contact");
            }
            None => orchestrator.handle_contact(
                contact_point,
                NORMAL,
                at,
                NORMAL * scenario.impulse,
                scenario.deflection,
            ),
        }
    };
    touch(&mut orchestrator, &mut surface, agent);
    tracing::info!(scenario = scenario.name, dt, "scenario started");

    for frame in 0..scenario.max_frames {
        if scenario.second_contact == Some(frame) {
            touch(&mut orchestrator, &mut surface, agent);
        }
        surface.step();
        let displacement = orchestrator.tick(&agent, &surface, dt, &mut color, &mut locked);
        agent += displacement;
        if agent.x < scenario.retreat_until {
            agent += vec3(scenario.retreat_speed * dt, 0.0, 0.0);
        }

        let events = orchestrator.drain_events();
        if events.iter().any(RecoveryEvent::is_completion) {
            recovered_at = Some(frame);
        }
        let state = orchestrator.state();
        frames.push(FrameRecord {
            frame,
            time: (frame + 1) as f32 * dt,
            agent_x: agent.x,
            distance: state.tracker.current_distance,
            speed: state.velocity.speed(),
            deflection: surface.surface_point().deflection(),
            color_state: state.color.state.name(),
            color,
            input_locked: locked,
            lock_reason: state.input_lock.reason_name(),
            blocking: state.completion.blocking_condition().map(RecoveryCondition::label),
            events,
        });

        let scripted_ahead = scenario.second_contact.is_some_and(|f| f > frame);
        if !orchestrator.is_active() && !scripted_ahead {
            break;
        }
    }

    let summary = SimulationSummary {
        scenario: scenario.name,
        frames: frames.len() as u32,
        contacts: orchestrator.total_contacts(),
        recoveries: orchestrator.total_recoveries(),
        recovered_at,
        input_locked: orchestrator.is_input_locked(),
        status: orchestrator.status_summary(),
    };
    tracing::info!(
        scenario = scenario.name,
        frames = summary.frames,
        recovered = summary.recovered_at.is_some(),
        "scenario finished"
    );
    Ok(Simulation { frames, summary })
}
