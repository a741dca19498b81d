//! Per-pair proximity tracking.
//!
//! [`ProximityStateManager`] keeps one [`TrackedPair`] per `(agent, obstacle)`
//! key, created lazily on the first sample. Each sample runs
//! [`determine_next_state`] and returns a [`StateChangeEvent`] when the state
//! changes. Callers filter events with the `is_*` predicates.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::{transition_description, ProximityState};
use super::transitions::determine_next_state;
use crate::config::ApproachParameters;
use crate::error::Result;

/// `(agent id, obstacle id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub agent: u64,
    pub obstacle: u64,
}

impl PairKey {
    pub fn new(agent: u64, obstacle: u64) -> Self {
        Self { agent, obstacle }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.agent, self.obstacle)
    }
}

/// Tracking record for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackedPair {
    pub state: ProximityState,
    pub previous_distance: Option<f32>,
    /// Samples since the last transition
    pub frames_in_state: u32,
    /// Samples spent holding in `Contact`
    pub total_contact_frames: u32,
}

/// A state change for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateChangeEvent {
    pub key: PairKey,
    pub previous_state: ProximityState,
    pub new_state: ProximityState,
    pub surface_distance: f32,
    pub timestamp: f64,
}

impl StateChangeEvent {
    pub fn description(&self) -> &'static str {
        transition_description(self.previous_state, self.new_state)
    }

    pub fn is_contact_enter(&self) -> bool {
        self.previous_state != ProximityState::Contact && self.new_state == ProximityState::Contact
    }

    pub fn is_contact_exit(&self) -> bool {
        self.previous_state == ProximityState::Contact && self.new_state != ProximityState::Contact
    }

    pub fn is_detection_enter(&self) -> bool {
        self.previous_state == ProximityState::Idle && self.new_state != ProximityState::Idle
    }

    pub fn is_detection_exit(&self) -> bool {
        self.previous_state != ProximityState::Idle && self.new_state == ProximityState::Idle
    }

    pub fn is_recovered(&self) -> bool {
        self.new_state == ProximityState::Recovered
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProximityStateManager {
    params: ApproachParameters,
    pairs: FxHashMap<PairKey, TrackedPair>,
}

impl ProximityStateManager {
    pub fn new(params: ApproachParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params, pairs: FxHashMap::default() })
    }

    pub fn params(&self) -> &ApproachParameters {
        &self.params
    }

    /// Current state; untracked pairs are `Idle`.
    pub fn state(&self, key: PairKey) -> ProximityState {
        self.pairs.get(&key).map_or(ProximityState::Idle, |p| p.state)
    }

    pub fn pair(&self, key: PairKey) -> Option<&TrackedPair> {
        self.pairs.get(&key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Tracked keys in ascending order.
    pub fn keys(&self) -> Vec<PairKey> {
        let mut keys: Vec<PairKey> = self.pairs.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Feed one distance sample for a pair.
    pub fn update(
        &mut self,
        key: PairKey,
        surface_distance: f32,
        timestamp: f64,
    ) -> Option<StateChangeEvent> {
        let params = self.params;
        let pair = self.pairs.entry(key).or_default();
        let (next, changed) =
            determine_next_state(pair.state, surface_distance, pair.previous_distance, &params);
        pair.previous_distance = Some(surface_distance);

        if !changed {
            pair.frames_in_state += 1;
            if pair.state == ProximityState::Contact {
                pair.total_contact_frames += 1;
            }
            return None;
        }

        let event = StateChangeEvent {
            key,
            previous_state: pair.state,
            new_state: next,
            surface_distance,
            timestamp,
        };
        pair.state = next;
        pair.frames_in_state = 0;
        tracing::debug!(
            pair = %key,
            from = ?event.previous_state,
            to = ?event.new_state,
            distance = surface_distance,
            "{}",
            event.description()
        );
        Some(event)
    }

    /// Forget one pair. Returns true if it was tracked.
    pub fn reset_pair(&mut self, key: PairKey) -> bool {
        self.pairs.remove(&key).is_some()
    }

    /// Forget every pair.
    pub fn reset(&mut self) {
        self.pairs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ProximityStateManager {
        ProximityStateManager::new(ApproachParameters::default()).unwrap()
    }

    #[test]
    fn test_lazy_creation_and_detection_enter() {
        let mut m = manager();
        let key = PairKey::new(1, 2);
        assert_eq!(m.state(key), ProximityState::Idle);
        assert!(m.is_empty());
        let ev = m.update(key, 0.8, 0.0).unwrap();
        assert!(ev.is_detection_enter());
        assert_eq!(ev.description(), "Agent entered detection range");
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_contact_lifecycle_events() {
        let mut m = manager();
        let key = PairKey::new(0, 0);
        let enter = m.update(key, 0.03, 0.0).unwrap();
        assert!(enter.is_contact_enter());
        assert!(enter.is_detection_enter());
        assert!(m.update(key, 0.03, 0.1).is_none());
        assert!(m.update(key, 0.03, 0.2).is_none());
        let pair = *m.pair(key).unwrap();
        assert_eq!(pair.frames_in_state, 2);
        assert_eq!(pair.total_contact_frames, 2);

        let exit = m.update(key, 0.10, 0.3).unwrap();
        assert!(exit.is_contact_exit());
        assert_eq!(exit.new_state, ProximityState::Retreating);
        let rec = m.update(key, 0.20, 0.4).unwrap();
        assert!(rec.is_recovered());
        let gone = m.update(key, 2.0, 0.5).unwrap();
        assert!(gone.is_detection_exit());
    }

    #[test]
    fn test_pairs_independent() {
        let mut m = manager();
        let a = PairKey::new(0, 0);
        let b = PairKey::new(0, 1);
        m.update(a, 0.02, 0.0);
        m.update(b, 0.9, 0.0);
        assert_eq!(m.state(a), ProximityState::Contact);
        assert_eq!(m.state(b), ProximityState::Approaching);
        assert!(m.reset_pair(a));
        assert!(!m.reset_pair(a));
        assert_eq!(m.state(a), ProximityState::Idle);
        assert_eq!(m.state(b), ProximityState::Approaching);
        assert_eq!(m.keys(), vec![b]);
        m.reset();
        assert!(m.is_empty());
    }
}
