//! # Recovery Configuration
//!
//! Every tuning constant of the contact/recovery core lives here.
//!
//! ## Presets
//! - `default`: 4cm / 15cm / 25cm / 1m thresholds
//! - `small_agent`, `large_agent`, `sensitive`: scaled thresholds
//!
//! ## Usage
//! ```rust
//! use tendroid_core::config::RecoveryConfig;
//!
//! let config = RecoveryConfig::default();
//! assert!(config.validate().is_ok());
//! let sensitive = RecoveryConfig::sensitive();
//! assert!(sensitive.approach.approach_epsilon > config.approach.approach_epsilon);
//! ```
//!
//! ## Environment Variables
//!
//! - `TENDROID_APPROACH_PROFILE`: preset name (small_agent, large_agent, sensitive, default)

mod approach_params;
mod color_config;
mod force_config;
mod orchestrator_config;
mod velocity_config;

pub use approach_params::ApproachParameters;
pub use color_config::{ColorConfig, Easing, FadeConfig, FadeMode};
pub use force_config::{RepulsionConfig, ZoneForces};
pub use orchestrator_config::{ColorFadeSource, GridConfig, OrchestratorConfig};
pub use velocity_config::{VelocityFadeConfig, VelocityFadeMode};

use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Environment variable selecting the approach preset.
pub const PROFILE_ENV_VAR: &str = "TENDROID_APPROACH_PROFILE";

/// Pretty-printed schema, built on first use.
static SCHEMA_JSON: Lazy<String> = Lazy::new(|| {
    serde_json::to_string_pretty(&RecoveryConfig::json_schema()).unwrap_or_default()
});

/// Full configuration for one agent/obstacle pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(default)]
pub struct RecoveryConfig {
    pub approach: ApproachParameters,
    pub zone_forces: ZoneForces,
    pub color: ColorConfig,
    pub fade: FadeConfig,
    pub velocity: VelocityFadeConfig,
    pub repulsion: RepulsionConfig,
    pub orchestrator: OrchestratorConfig,
}

impl RecoveryConfig {
    /// Default config with the given approach thresholds. Color exit distance
    /// and distance-fade range follow the thresholds.
    pub fn with_approach(approach: ApproachParameters) -> Self {
        let mut cfg = Self { approach, ..Self::default() };
        cfg.color.approach_minimum = approach.approach_minimum;
        cfg.fade.fade_start_distance = approach.approach_epsilon;
        cfg.fade.fade_end_distance = approach.approach_minimum;
        cfg
    }

    pub fn small_agent() -> Self {
        Self::with_approach(ApproachParameters::small_agent())
    }

    pub fn large_agent() -> Self {
        let mut cfg = Self::with_approach(ApproachParameters::large_agent());
        cfg.orchestrator.agent_mass = 4.0;
        cfg.velocity.fade_distance = 0.5;
        cfg
    }

    pub fn sensitive() -> Self {
        let mut cfg = Self::with_approach(ApproachParameters::sensitive());
        cfg.zone_forces.detected = 1.0;
        cfg
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Result<Self> {
        ApproachParameters::preset(name)?;
        Ok(match name.to_lowercase().as_str() {
            "small_agent" => Self::small_agent(),
            "large_agent" => Self::large_agent(),
            "sensitive" => Self::sensitive(),
            _ => Self::default(),
        })
    }

    /// Preset selected by `TENDROID_APPROACH_PROFILE`, default otherwise.
    pub fn from_env_or_default() -> Self {
        match env::var(PROFILE_ENV_VAR).unwrap_or_default().to_lowercase().as_str() {
            "small_agent" => Self::small_agent(),
            "large_agent" => Self::large_agent(),
            "sensitive" => Self::sensitive(),
            _ => Self::default(),
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.approach.validate()?;
        self.zone_forces.validate()?;
        self.color.validate()?;
        self.fade.validate()?;
        self.velocity.validate()?;
        self.repulsion.validate()?;
        self.orchestrator.validate()?;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let text = std::fs::read_to_string(path)?;
        let result = match ext.as_str() {
            "json" => Self::from_json_str(&text),
            "yaml" | "yml" => Self::from_yaml_str(&text),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        match &result {
            Ok(_) => log::info!("Loaded recovery config from {}", path.display()),
            Err(e) => log::warn!("Rejected recovery config {}: {}", path.display(), e),
        }
        result
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// JSON schema of the whole config, for editors and tooling.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RecoveryConfig)
    }

    /// [`json_schema`](Self::json_schema) as pretty JSON, cached.
    pub fn json_schema_string() -> &'static str {
        SCHEMA_JSON.as_str()
    }
}
