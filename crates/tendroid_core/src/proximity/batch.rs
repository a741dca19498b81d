//! Batch proximity detection.
//!
//! [`BatchProximityContext`] owns a rayon thread pool for the lifetime of the
//! context. Every element runs the same [`ProximityDetector::detect`] call as
//! the single-pair path, so batch and single results are bit-identical and
//! independent of scheduling.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::detector::{ObstacleCylinder, ProximityDetector, ProximityResult};
use super::hash_grid::{NearestObstacle, SpatialHashGrid};
use crate::error::Result;
use crate::math::Vec3;

/// Batches at or below this size run sequentially.
pub const PARALLEL_THRESHOLD: usize = 64;

pub struct BatchProximityContext {
    detector: ProximityDetector,
    pool: ThreadPool,
    parallel_threshold: usize,
}

impl BatchProximityContext {
    /// `threads == 0` lets rayon pick the thread count.
    pub fn new(detector: ProximityDetector, threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tendroid-proximity-{i}"))
            .build()?;
        tracing::debug!(threads = pool.current_num_threads(), "proximity batch pool ready");
        Ok(Self { detector, pool, parallel_threshold: PARALLEL_THRESHOLD })
    }

    /// Override the sequential cutoff (0 forces the pool for every batch).
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn detector(&self) -> &ProximityDetector {
        &self.detector
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Every agent against one obstacle, in input order.
    pub fn detect_all(&self, agents: &[Vec3], obstacle: &ObstacleCylinder) -> Vec<ProximityResult> {
        let detector = &self.detector;
        if agents.len() > self.parallel_threshold {
            self.pool
                .install(|| agents.par_iter().map(|a| detector.detect(a, obstacle)).collect())
        } else {
            agents.iter().map(|a| detector.detect(a, obstacle)).collect()
        }
    }

    /// Explicit `(agent, obstacle)` pairs, in input order.
    pub fn detect_pairs(&self, pairs: &[(Vec3, ObstacleCylinder)]) -> Vec<ProximityResult> {
        let detector = &self.detector;
        if pairs.len() > self.parallel_threshold {
            self.pool.install(|| pairs.par_iter().map(|(a, o)| detector.detect(a, o)).collect())
        } else {
            pairs.iter().map(|(a, o)| detector.detect(a, o)).collect()
        }
    }

    /// Nearest obstacle within detection radius for every agent.
    pub fn nearest_all(&self, agents: &[Vec3], grid: &SpatialHashGrid) -> Vec<Option<NearestObstacle>> {
        let radius = self.detector.params().detection_radius;
        if agents.len() > self.parallel_threshold {
            self.pool
                .install(|| agents.par_iter().map(|a| grid.nearest_surface(a, radius)).collect())
        } else {
            agents.iter().map(|a| grid.nearest_surface(a, radius)).collect()
        }
    }
}

impl std::fmt::Debug for BatchProximityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProximityContext")
            .field("detector", &self.detector)
            .field("threads", &self.pool.current_num_threads())
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::math::vec3;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn batch_equals_single(
            points in prop::collection::vec((-3.0f32..3.0, -1.0f32..1.0, -3.0f32..3.0), 0..200),
            radius in 0.05f32..1.0,
        ) {
            let ctx = BatchProximityContext::new(ProximityDetector::default(), 2)
                .unwrap()
                .with_parallel_threshold(0);
            let obstacle = ObstacleCylinder::new(vec3(0.1, 0.0, -0.2), radius);
            let agents: Vec<Vec3> = points.iter().map(|&(x, y, z)| vec3(x, y, z)).collect();
            let batch = ctx.detect_all(&agents, &obstacle);
            for (a, got) in agents.iter().zip(&batch) {
                let single = ctx.detector().detect(a, &obstacle);
                prop_assert_eq!(got.surface_distance.to_bits(), single.surface_distance.to_bits());
                prop_assert_eq!(got.zone, single.zone);
            }
        }
    }
}
