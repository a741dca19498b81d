//! Force tables: per-zone proximity push and contact repulsion.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};
use crate::proximity::Zone;

/// Radial push magnitude per zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ZoneForces {
    pub contact: f32,
    pub recovering: f32,
    pub approaching: f32,
    pub detected: f32,
}

impl Default for ZoneForces {
    fn default() -> Self {
        Self { contact: 10.0, recovering: 5.0, approaching: 2.0, detected: 0.5 }
    }
}

impl ZoneForces {
    /// No push in any zone.
    pub fn none() -> Self {
        Self { contact: 0.0, recovering: 0.0, approaching: 0.0, detected: 0.0 }
    }

    /// Magnitude for a zone; `Idle` is always 0.
    #[inline]
    pub fn strength(&self, zone: Zone) -> f32 {
        match zone {
            Zone::Contact => self.contact,
            Zone::Recovering => self.recovering,
            Zone::Approaching => self.approaching,
            Zone::Detected => self.detected,
            Zone::Idle => 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("zone_forces.contact", self.contact)?;
        ensure_non_negative("zone_forces.recovering", self.recovering)?;
        ensure_non_negative("zone_forces.approaching", self.approaching)?;
        ensure_non_negative("zone_forces.detected", self.detected)?;
        Ok(())
    }
}

/// Contact repulsion tuning (Newtons).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RepulsionConfig {
    pub base_force: f32,
    pub max_force: f32,
    pub min_force: f32,
    /// Extra force added per meter of penetration
    pub penetration_multiplier: f32,
    /// Extra force added per m/s of approach speed
    pub velocity_multiplier: f32,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            base_force: 100.0,
            max_force: 500.0,
            min_force: 10.0,
            penetration_multiplier: 2.0,
            velocity_multiplier: 0.5,
        }
    }
}

impl RepulsionConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("base_force", self.base_force)?;
        ensure_non_negative("min_force", self.min_force)?;
        if !(self.max_force >= self.min_force) {
            return Err(ConfigError::EmptyRange {
                field: "repulsion force",
                start: self.min_force,
                end: self.max_force,
            });
        }
        ensure_non_negative("penetration_multiplier", self.penetration_multiplier)?;
        ensure_non_negative("velocity_multiplier", self.velocity_multiplier)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_strength_table() {
        let f = ZoneForces::default();
        assert_eq!(f.strength(Zone::Contact), 10.0);
        assert_eq!(f.strength(Zone::Recovering), 5.0);
        assert_eq!(f.strength(Zone::Approaching), 2.0);
        assert_eq!(f.strength(Zone::Detected), 0.5);
        assert_eq!(f.strength(Zone::Idle), 0.0);
        assert_eq!(ZoneForces::none().strength(Zone::Contact), 0.0);
    }

    #[test]
    fn test_repulsion_defaults_valid() {
        assert!(RepulsionConfig::default().validate().is_ok());
        let bad = RepulsionConfig { max_force: 5.0, ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
