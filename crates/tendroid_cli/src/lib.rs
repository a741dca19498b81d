//! Tendroid CLI Library
//!
//! Config inspection helpers and scripted recovery scenarios behind the
//! `tendroid_cli` binary.

pub mod simulate;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tendroid_core::{ApproachParameters, RecoveryConfig, Zone};

pub use simulate::{run_scenario, FrameRecord, Scenario, Simulation, SimulationSummary};

/// One zone band in centimeters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneBand {
    pub zone: &'static str,
    pub upper_cm: Option<f32>,
}

/// Zone bands from the surface outward; the last band is unbounded.
pub fn zone_bands(params: &ApproachParameters) -> Vec<ZoneBand> {
    let uppers = params.to_centimeters().map(|(_, cm)| Some(cm));
    Zone::ALL
        .into_iter()
        .zip(uppers.into_iter().chain(std::iter::once(None)))
        .map(|(zone, upper_cm)| ZoneBand { zone: zone.name(), upper_cm })
        .collect()
}

/// Load and validate a config file, with the path in any error.
pub fn load_config(path: &Path) -> Result<RecoveryConfig> {
    RecoveryConfig::load(path)
        .with_context(|| format!("Failed to load recovery config: {}", path.display()))
}

/// Preset by name, or the `TENDROID_APPROACH_PROFILE` preset when `None`.
pub fn resolve_config(file: Option<&Path>, preset: Option<&str>) -> Result<RecoveryConfig> {
    match (file, preset) {
        (Some(path), _) => load_config(path),
        (None, Some(name)) => Ok(RecoveryConfig::preset(name)?),
        (None, None) => Ok(RecoveryConfig::from_env_or_default()),
    }
}
