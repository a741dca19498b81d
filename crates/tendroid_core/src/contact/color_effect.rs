//! Shock color state.
//!
//! `Normal ──shock──► Shocked ──start_recovery──► Recovering ──progress ≥ 1──► Normal`.
//! A new shock restarts from `Shocked` in any state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ColorConfig;
use crate::math::{clamp01, lerp_color, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorEffectState {
    #[default]
    Normal,
    Shocked,
    Recovering,
}

impl ColorEffectState {
    pub fn name(self) -> &'static str {
        match self {
            ColorEffectState::Normal => "NORMAL",
            ColorEffectState::Shocked => "SHOCKED",
            ColorEffectState::Recovering => "RECOVERING",
        }
    }
}

impl fmt::Display for ColorEffectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorEffectStatus {
    pub state: ColorEffectState,
    pub current_color: Color,
    pub shock_count: u32,
    /// 0 = shock color, 1 = normal color
    pub recovery_progress: f32,
}

impl Default for ColorEffectStatus {
    fn default() -> Self {
        Self::normal(&ColorConfig::default())
    }
}

impl ColorEffectStatus {
    pub fn normal(config: &ColorConfig) -> Self {
        Self {
            state: ColorEffectState::Normal,
            current_color: config.normal_color,
            shock_count: 0,
            recovery_progress: 1.0,
        }
    }

    /// Jump to the shock color from any state.
    #[must_use]
    pub fn trigger_shock(&self, config: &ColorConfig) -> Self {
        Self {
            state: ColorEffectState::Shocked,
            current_color: config.shock_color,
            shock_count: self.shock_count + 1,
            recovery_progress: 0.0,
        }
    }

    /// `Shocked → Recovering`; other states unchanged.
    #[must_use]
    pub fn start_recovery(&self) -> Self {
        if self.state != ColorEffectState::Shocked {
            return *self;
        }
        Self { state: ColorEffectState::Recovering, recovery_progress: 0.0, ..*self }
    }

    /// Blend toward normal by `progress`; reaching 1 finishes the fade.
    /// Ignored unless `Recovering`.
    #[must_use]
    pub fn update_recovery(&self, progress: f32, config: &ColorConfig) -> Self {
        if self.state != ColorEffectState::Recovering {
            return *self;
        }
        let progress = clamp01(progress);
        if progress >= 1.0 {
            return self.reset_to_normal(config);
        }
        Self {
            current_color: lerp_color(config.shock_color, config.normal_color, progress),
            recovery_progress: progress,
            ..*self
        }
    }

    /// Direct exit: `Shocked → Normal` once the agent is at least
    /// `config.approach_minimum` away.
    #[must_use]
    pub fn check_shock_exit(&self, distance: f32, config: &ColorConfig) -> Self {
        if self.state == ColorEffectState::Shocked && distance >= config.approach_minimum {
            self.reset_to_normal(config)
        } else {
            *self
        }
    }

    /// Normal color immediately; keeps `shock_count`.
    #[must_use]
    pub fn reset_to_normal(&self, config: &ColorConfig) -> Self {
        Self { shock_count: self.shock_count, ..Self::normal(config) }
    }

    pub fn is_normal(&self) -> bool {
        self.state == ColorEffectState::Normal
    }

    pub fn is_shocked(&self) -> bool {
        self.state == ColorEffectState::Shocked
    }

    pub fn is_recovering(&self) -> bool {
        self.state == ColorEffectState::Recovering
    }
}
