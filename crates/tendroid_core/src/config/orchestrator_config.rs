//! Orchestrator and spatial-index configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, ConfigError, Result};

/// Where color recovery progress comes from while `Recovering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorFadeSource {
    /// Approach tracker progress toward the recovery threshold
    #[default]
    TrackerProgress,
    /// The `FadeConfig` strategy (distance, speed, time or blend)
    FadeStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Agent mass (kg) used to turn contact force into velocity
    pub agent_mass: f32,
    /// Impulse duration (s) used to turn contact force into velocity
    pub impulse_dt: f32,
    /// Max surface deflection (m) that still counts as "at rest"
    pub rest_tolerance: f32,
    pub color_fade_source: ColorFadeSource,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            agent_mass: 1.0,
            impulse_dt: 1.0 / 60.0,
            rest_tolerance: 0.01,
            color_fade_source: ColorFadeSource::TrackerProgress,
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("agent_mass", self.agent_mass)?;
        ensure_positive("impulse_dt", self.impulse_dt)?;
        ensure_non_negative("rest_tolerance", self.rest_tolerance)?;
        Ok(())
    }
}

/// Spatial hash grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GridConfig {
    pub grid_size_x: u32,
    pub grid_size_y: u32,
    pub grid_size_z: u32,
    /// Cell edge length (m)
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::medium()
    }
}

impl GridConfig {
    pub fn small() -> Self {
        Self { grid_size_x: 64, grid_size_y: 32, grid_size_z: 64, cell_size: 0.5 }
    }

    pub fn medium() -> Self {
        Self { grid_size_x: 128, grid_size_y: 64, grid_size_z: 128, cell_size: 1.0 }
    }

    pub fn large() -> Self {
        Self { grid_size_x: 256, grid_size_y: 128, grid_size_z: 256, cell_size: 2.0 }
    }

    /// Total addressable cells.
    pub fn total_cells(&self) -> u64 {
        u64::from(self.grid_size_x) * u64::from(self.grid_size_y) * u64::from(self.grid_size_z)
    }

    /// World-space extent (m) along each axis.
    pub fn world_extent(&self) -> [f32; 3] {
        [
            self.grid_size_x as f32 * self.cell_size,
            self.grid_size_y as f32 * self.cell_size,
            self.grid_size_z as f32 * self.cell_size,
        ]
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("cell_size", self.cell_size)?;
        if self.grid_size_x == 0 || self.grid_size_z == 0 {
            return Err(ConfigError::NonPositive { field: "grid_size", value: 0.0 });
        }
        Ok(())
    }
}
