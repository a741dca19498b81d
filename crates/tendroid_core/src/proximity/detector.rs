//! Stateless proximity detection.
//!
//! Distances are measured in the XZ ground plane from the agent to the
//! obstacle *surface* (`hypot(dx, dz) - radius`, negative when inside).

use serde::{Deserialize, Serialize};

use super::Zone;
use crate::config::{ApproachParameters, RecoveryConfig, ZoneForces};
use crate::contact::SurfacePoint;
use crate::error::Result;
use crate::math::{
    horizontal_direction, horizontal_distance, horizontal_offset, normalize_or, Vec3,
    FALLBACK_DIRECTION,
};

/// Vertical cylinder approximating an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleCylinder {
    pub center: Vec3,
    pub radius: f32,
}

impl ObstacleCylinder {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Signed horizontal distance from `point` to the cylinder surface.
    #[inline]
    pub fn surface_distance(&self, point: &Vec3) -> f32 {
        horizontal_distance(&self.center, point) - self.radius
    }
}

/// One detection result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityResult {
    /// Signed surface distance (m)
    pub surface_distance: f32,
    pub zone: Zone,
    /// Unit XZ direction obstacle → agent
    pub direction: Vec3,
    /// `direction * zone strength`
    pub force: Vec3,
}

impl ProximityResult {
    pub fn is_contact(&self) -> bool {
        self.zone.is_contact()
    }

    pub fn is_detected(&self) -> bool {
        self.zone.is_detected()
    }
}

/// Distance, zone and radial force for agent/obstacle pairs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProximityDetector {
    params: ApproachParameters,
    forces: ZoneForces,
}

impl ProximityDetector {
    pub fn new(params: ApproachParameters, forces: ZoneForces) -> Result<Self> {
        params.validate()?;
        forces.validate()?;
        Ok(Self { params, forces })
    }

    /// Detector with the zones and zone forces of a recovery config.
    pub fn from_config(config: &RecoveryConfig) -> Result<Self> {
        Self::new(config.approach, config.zone_forces)
    }

    pub fn params(&self) -> &ApproachParameters {
        &self.params
    }

    pub fn forces(&self) -> &ZoneForces {
        &self.forces
    }

    #[inline]
    pub fn classify(&self, surface_distance: f32) -> Zone {
        self.params.zone_for(surface_distance)
    }

    /// Detect against a cylinder.
    #[inline]
    pub fn detect(&self, agent: &Vec3, obstacle: &ObstacleCylinder) -> ProximityResult {
        let surface_distance = obstacle.surface_distance(agent);
        let direction = horizontal_direction(&obstacle.center, agent);
        self.from_distance(surface_distance, direction)
    }

    /// Detect against an already resolved surface point. Distance is the
    /// horizontal gap to the point's current position, negative when the
    /// agent sits behind the outward normal.
    pub fn detect_surface(&self, agent: &Vec3, surface: &SurfacePoint) -> ProximityResult {
        let normal = surface.outward_normal;
        let direction = normalize_or(&Vec3::new(normal.x, 0.0, normal.z), FALLBACK_DIRECTION);
        let offset = horizontal_offset(&surface.current_position, agent);
        let gap = offset.norm();
        let surface_distance = if offset.dot(&direction) < 0.0 { -gap } else { gap };
        self.from_distance(surface_distance, direction)
    }

    /// Zone and force for a precomputed distance and direction.
    #[inline]
    pub fn from_distance(&self, surface_distance: f32, direction: Vec3) -> ProximityResult {
        let zone = self.classify(surface_distance);
        let force = direction * self.forces.strength(zone);
        ProximityResult { surface_distance, zone, direction, force }
    }

    /// Smooth-falloff push: `strength * (1 - d/detection)^2` inside detection
    /// range, full strength inside the obstacle, zero beyond.
    pub fn falloff_force(&self, agent: &Vec3, obstacle: &ObstacleCylinder, strength: f32) -> Vec3 {
        let surface_distance = obstacle.surface_distance(agent);
        let direction = horizontal_direction(&obstacle.center, agent);
        let detection = self.params.detection_radius;
        if surface_distance <= 0.0 {
            direction * strength
        } else if surface_distance < detection {
            let t = surface_distance / detection;
            direction * (strength * (1.0 - t) * (1.0 - t))
        } else {
            Vec3::zeros()
        }
    }
}
