//! Spatial hash over obstacle centers in the XZ plane.
//!
//! Cells wrap modulo the grid dimensions, so distant obstacles may share a
//! bucket; every candidate is distance-checked before it is returned.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::detector::ObstacleCylinder;
use crate::config::GridConfig;
use crate::error::Result;
use crate::math::Vec3;

/// Closest obstacle surface found by a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestObstacle {
    /// Insertion index in the grid
    pub index: usize,
    /// Caller-supplied obstacle id
    pub id: u64,
    pub surface_distance: f32,
}

#[derive(Debug, Clone)]
struct Entry {
    id: u64,
    obstacle: ObstacleCylinder,
}

#[derive(Debug, Clone)]
pub struct SpatialHashGrid {
    config: GridConfig,
    entries: Vec<Entry>,
    cells: FxHashMap<(u32, u32), Vec<usize>>,
    max_radius: f32,
    dirty: bool,
}

impl SpatialHashGrid {
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            entries: Vec::new(),
            cells: FxHashMap::default(),
            max_radius: 0.0,
            dirty: false,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register an obstacle. Returns its index.
    pub fn insert(&mut self, id: u64, obstacle: ObstacleCylinder) -> usize {
        let index = self.entries.len();
        self.entries.push(Entry { id, obstacle });
        self.max_radius = self.max_radius.max(obstacle.radius);
        let key = self.cell_of(&obstacle.center);
        self.cells.entry(key).or_default().push(index);
        index
    }

    /// Move an obstacle; buckets are rebuilt lazily before the next query.
    /// Returns false for an unknown index.
    pub fn update_center(&mut self, index: usize, center: Vec3) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.obstacle.center = center;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Re-bucket every obstacle.
    pub fn rebuild(&mut self) {
        self.cells.clear();
        self.max_radius = 0.0;
        for index in 0..self.entries.len() {
            let obstacle = self.entries[index].obstacle;
            self.max_radius = self.max_radius.max(obstacle.radius);
            let key = self.cell_of(&obstacle.center);
            self.cells.entry(key).or_default().push(index);
        }
        self.dirty = false;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
        self.max_radius = 0.0;
        self.dirty = false;
    }

    pub fn obstacle(&self, index: usize) -> Option<&ObstacleCylinder> {
        self.entries.get(index).map(|e| &e.obstacle)
    }

    /// Indices of obstacles whose surface lies within `radius` of `point`
    /// (horizontal), ascending.
    pub fn query_neighbors(&self, point: &Vec3, radius: f32) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .candidates(point, radius)
            .into_iter()
            .filter(|&i| self.entries[i].obstacle.surface_distance(point) <= radius)
            .collect();
        found.sort_unstable();
        found
    }

    /// Nearest obstacle surface within `radius`; ties go to the lower index.
    pub fn nearest_surface(&self, point: &Vec3, radius: f32) -> Option<NearestObstacle> {
        let mut best: Option<NearestObstacle> = None;
        for index in self.query_neighbors(point, radius) {
            let entry = &self.entries[index];
            let surface_distance = entry.obstacle.surface_distance(point);
            if best.map_or(true, |b| surface_distance < b.surface_distance) {
                best = Some(NearestObstacle { index, id: entry.id, surface_distance });
            }
        }
        best
    }

    fn cell_coord(&self, v: f32) -> i64 {
        (v / self.config.cell_size).floor() as i64
    }

    fn cell_of(&self, p: &Vec3) -> (u32, u32) {
        let gx = i64::from(self.config.grid_size_x);
        let gz = i64::from(self.config.grid_size_z);
        (
            self.cell_coord(p.x).rem_euclid(gx) as u32,
            self.cell_coord(p.z).rem_euclid(gz) as u32,
        )
    }

    fn axis_cells(&self, lo: f32, hi: f32, dim: u32) -> Vec<u32> {
        let dim = i64::from(dim);
        let first = self.cell_coord(lo);
        let last = self.cell_coord(hi);
        if last - first + 1 >= dim {
            return (0..dim as u32).collect();
        }
        (first..=last).map(|c| c.rem_euclid(dim) as u32).collect()
    }

    fn candidates(&self, point: &Vec3, radius: f32) -> Vec<usize> {
        if self.dirty {
            tracing::warn!("hash grid queried with stale buckets; call rebuild() after moves");
            return (0..self.entries.len()).collect();
        }
        let reach = radius.max(0.0) + self.max_radius;
        let xs = self.axis_cells(point.x - reach, point.x + reach, self.config.grid_size_x);
        let zs = self.axis_cells(point.z - reach, point.z + reach, self.config.grid_size_z);
        let mut out = Vec::new();
        for &x in &xs {
            for &z in &zs {
                if let Some(bucket) = self.cells.get(&(x, z)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}
