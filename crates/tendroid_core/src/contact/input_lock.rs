//! Agent input latch.
//!
//! The reason tag is diagnostic only; locking and unlocking depend solely on
//! contact and the completion gate.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::color_effect::{ColorEffectState, ColorEffectStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputLockReason {
    #[default]
    None,
    Contact,
    Repelling,
    Recovering,
}

impl InputLockReason {
    pub fn name(self) -> &'static str {
        match self {
            InputLockReason::None => "NONE",
            InputLockReason::Contact => "CONTACT",
            InputLockReason::Repelling => "REPELLING",
            InputLockReason::Recovering => "RECOVERING",
        }
    }
}

impl fmt::Display for InputLockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputLockStatus {
    pub is_locked: bool,
    pub reason: InputLockReason,
    pub lock_count: u32,
}

impl InputLockStatus {
    #[must_use]
    pub fn lock_input_on_contact(&self) -> Self {
        Self { is_locked: true, reason: InputLockReason::Contact, lock_count: self.lock_count + 1 }
    }

    /// Change the reason of a held lock; no-op when unlocked.
    #[must_use]
    pub fn update_lock_reason(&self, reason: InputLockReason) -> Self {
        if !self.is_locked {
            return *self;
        }
        Self { reason, ..*self }
    }

    #[must_use]
    pub fn unlock_input_on_recovery_complete(&self) -> Self {
        Self { is_locked: false, reason: InputLockReason::None, lock_count: self.lock_count }
    }

    /// Follow the color state: normal unlocks, shocked locks (repelling),
    /// recovering locks (recovering).
    #[must_use]
    pub fn sync_from_color_state(&self, color: &ColorEffectStatus) -> Self {
        match color.state {
            ColorEffectState::Normal => {
                if self.is_locked {
                    self.unlock_input_on_recovery_complete()
                } else {
                    *self
                }
            }
            ColorEffectState::Shocked => {
                if self.is_locked {
                    self.update_lock_reason(InputLockReason::Repelling)
                } else {
                    self.lock_input_on_contact()
                }
            }
            ColorEffectState::Recovering => {
                if self.is_locked {
                    self.update_lock_reason(InputLockReason::Recovering)
                } else {
                    Self {
                        is_locked: true,
                        reason: InputLockReason::Recovering,
                        lock_count: self.lock_count + 1,
                    }
                }
            }
        }
    }

    /// Whether movement input should reach the agent.
    pub fn should_apply_input(&self) -> bool {
        !self.is_locked
    }

    /// Reason name, `NONE` while unlocked.
    pub fn reason_name(&self) -> &'static str {
        if self.is_locked {
            self.reason.name()
        } else {
            InputLockReason::None.name()
        }
    }
}
