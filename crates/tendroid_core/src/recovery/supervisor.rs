//! Many pairs at once.
//!
//! [`RecoverySupervisor`] owns the proximity manager and one
//! [`RecoveryOrchestrator`] per pair. Pairs never share state, so a frame
//! ticks them in parallel; results always come back sorted by [`PairKey`].

use fxhash::FxHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::events::RecoveryEvent;
use super::orchestrator::RecoveryOrchestrator;
use crate::config::RecoveryConfig;
use crate::contact::{ContactEvent, RepulsionResult};
use crate::error::Result;
use crate::math::Vec3;
use crate::proximity::batch::PARALLEL_THRESHOLD;
use crate::proximity::{
    ObstacleCylinder, PairKey, ProximityDetector, ProximityResult, ProximityStateManager,
    StateChangeEvent,
};

/// Positions for one pair in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairFrame {
    pub key: PairKey,
    pub agent: Vec3,
    pub surface_position: Vec3,
    pub surface_normal: Option<Vec3>,
}

/// What one pair produced in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairTick {
    pub key: PairKey,
    pub displacement: Vec3,
    pub input_locked: bool,
    pub events: Vec<RecoveryEvent>,
}

pub struct RecoverySupervisor {
    config: RecoveryConfig,
    detector: ProximityDetector,
    proximity: ProximityStateManager,
    orchestrators: FxHashMap<PairKey, RecoveryOrchestrator>,
    parallel_threshold: usize,
}

impl RecoverySupervisor {
    pub fn new(config: RecoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector: ProximityDetector::from_config(&config)?,
            proximity: ProximityStateManager::new(config.approach)?,
            orchestrators: FxHashMap::default(),
            parallel_threshold: PARALLEL_THRESHOLD,
        })
    }

    /// Pair count above which `tick_all` goes parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    pub fn detector(&self) -> &ProximityDetector {
        &self.detector
    }

    pub fn proximity(&self) -> &ProximityStateManager {
        &self.proximity
    }

    pub fn orchestrator(&self, key: PairKey) -> Option<&RecoveryOrchestrator> {
        self.orchestrators.get(&key)
    }

    /// Pairs that have an orchestrator, sorted.
    pub fn keys(&self) -> Vec<PairKey> {
        let mut keys: Vec<_> = self.orchestrators.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn active_count(&self) -> usize {
        self.orchestrators.values().filter(|o| o.is_active()).count()
    }

    fn entry(&mut self, key: PairKey) -> &mut RecoveryOrchestrator {
        let config = self.config;
        self.orchestrators
            .entry(key)
            .or_insert_with(|| RecoveryOrchestrator::from_validated(config))
    }

    /// Feed a proximity sample. The pair gets an orchestrator on first sight.
    pub fn observe(
        &mut self,
        key: PairKey,
        surface_distance: f32,
        timestamp: f64,
    ) -> Option<StateChangeEvent> {
        self.entry(key);
        self.proximity.update(key, surface_distance, timestamp)
    }

    /// Measure `agent` against `obstacle` and feed the surface distance to
    /// [`observe`](Self::observe). The result carries the configured zone force.
    pub fn observe_obstacle(
        &mut self,
        key: PairKey,
        agent: &Vec3,
        obstacle: &ObstacleCylinder,
        timestamp: f64,
    ) -> (ProximityResult, Option<StateChangeEvent>) {
        let result = self.detector.detect(agent, obstacle);
        let change = self.observe(key, result.surface_distance, timestamp);
        (result, change)
    }

    /// Start (or restart) recovery for a pair.
    pub fn dispatch_contact(&mut self, key: PairKey, event: &ContactEvent) {
        tracing::debug!(pair = %key, impulse = event.impulse, "dispatching contact");
        self.entry(key).handle_contact_event(event);
    }

    /// Start (or restart) recovery for a pair touching a cylinder obstacle,
    /// pushed by the configured repulsion.
    pub fn dispatch_obstacle_contact(
        &mut self,
        key: PairKey,
        agent: Vec3,
        obstacle: &ObstacleCylinder,
        approach_speed: f32,
        deflection: f32,
    ) -> RepulsionResult {
        let result =
            self.entry(key).handle_obstacle_contact(agent, obstacle, approach_speed, deflection);
        tracing::debug!(pair = %key, magnitude = result.magnitude, "dispatching obstacle contact");
        result
    }

    /// Advance every pair that has a frame. Frames for unknown pairs are
    /// skipped; the last frame wins when a key repeats.
    pub fn tick_all(&mut self, frames: &[PairFrame], dt: f32) -> Vec<PairTick> {
        let mut by_key: Vec<PairFrame> = frames.to_vec();
        by_key.sort_by_key(|f| f.key);
        by_key.reverse();
        by_key.dedup_by_key(|f| f.key);
        by_key.reverse();

        let mut pairs: Vec<(PairKey, &mut RecoveryOrchestrator)> =
            self.orchestrators.iter_mut().map(|(k, o)| (*k, o)).collect();
        pairs.sort_unstable_by_key(|(k, _)| *k);

        let step = |(key, orchestrator): &mut (PairKey, &mut RecoveryOrchestrator)| {
            let i = by_key.binary_search_by_key(&*key, |f| f.key).ok()?;
            let frame = &by_key[i];
            let displacement = orchestrator.update(
                frame.agent,
                frame.surface_position,
                dt,
                frame.surface_normal,
            );
            Some(PairTick {
                key: *key,
                displacement,
                input_locked: orchestrator.is_input_locked(),
                events: orchestrator.drain_events(),
            })
        };

        if pairs.len() > self.parallel_threshold {
            pairs.par_iter_mut().filter_map(step).collect()
        } else {
            pairs.iter_mut().filter_map(step).collect()
        }
    }

    /// Forget one pair everywhere. Returns true if anything was tracked.
    pub fn reset_pair(&mut self, key: PairKey) -> bool {
        let had_orchestrator = self.orchestrators.remove(&key).is_some();
        let had_proximity = self.proximity.reset_pair(key);
        had_orchestrator || had_proximity
    }

    pub fn reset(&mut self) {
        self.orchestrators.clear();
        self.proximity.reset();
    }
}

impl std::fmt::Debug for RecoverySupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoverySupervisor")
            .field("pairs", &self.orchestrators.len())
            .field("active", &self.active_count())
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}
