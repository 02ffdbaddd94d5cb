//! Whole-grid carving with density-based rejection sampling.

use tracing::{debug, info, warn};

use crate::config::{ConfigError, DungeonConfig};
use crate::error::DungeonError;
use crate::types::GridPos;

use super::cell::{
    BREAKABLE_ROOM, EMPTY, END_ROOM, GENERIC_ROOM, START_ROOM, branch_marker, pillar_anchor,
};
use super::grid::Grid;
use super::seed::DungeonRng;
use super::walk::{WalkOutcome, carve_branch_walk, carve_primary_walk};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DensityMetrics {
    pub total_sum: i64,
    pub inner_sum: i64,
}

impl DensityMetrics {
    pub fn measure(grid: &Grid) -> Self {
        Self { total_sum: grid.sum(), inner_sum: grid.sum_of_code(GENERIC_ROOM) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DensityLimits {
    pub total: f64,
    pub inner: f64,
}

impl DensityLimits {
    pub fn new(small_size: usize, big_size: usize, difficulty: u32) -> Self {
        let difficulty = f64::from(difficulty.max(1));
        Self {
            total: (big_size * big_size) as f64 * 0.8 / difficulty * 1.5,
            inner: (small_size * small_size) as f64 * 0.8 / difficulty,
        }
    }

    pub fn accepts(&self, metrics: DensityMetrics) -> bool {
        metrics.total_sum as f64 <= self.total && metrics.inner_sum as f64 <= self.inner
    }

    /// How far `metrics` overshoots both limits combined; zero when accepted.
    pub fn excess(&self, metrics: DensityMetrics) -> f64 {
        (metrics.total_sum as f64 - self.total).max(0.0)
            + (metrics.inner_sum as f64 - self.inner).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarveReport {
    pub attempts: u32,
    /// False when every attempt failed the density check and the least-dense
    /// attempt was kept instead.
    pub satisfied: bool,
    pub density: DensityMetrics,
    pub limits: DensityLimits,
}

/// Finished grid in padded coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct CarvedGrid {
    pub grid: Grid,
    pub start: GridPos,
    pub end: GridPos,
    pub pillar_anchors: Vec<GridPos>,
    pub breakable_rooms: Vec<GridPos>,
    pub report: CarveReport,
}

struct Maze {
    grid: Grid,
    pillar_anchors: Vec<GridPos>,
    breakable_rooms: Vec<GridPos>,
}

pub struct GridCarver<'a> {
    config: &'a DungeonConfig,
    start: GridPos,
    end: GridPos,
    limits: DensityLimits,
}

impl<'a> GridCarver<'a> {
    pub fn new(config: &'a DungeonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            start: config.start,
            end: config.end_room(),
            limits: DensityLimits::new(config.small_size, config.big_size, config.difficulty),
        })
    }

    pub fn carve(&self, seed: u64) -> Result<CarvedGrid, DungeonError> {
        let mut best: Option<(f64, Maze, DensityMetrics)> = None;

        for attempt in 1..=self.config.max_attempts {
            let mut rng = DungeonRng::for_stream(seed, u64::from(attempt));
            let Some(maze) = self.carve_attempt(&mut rng) else {
                debug!(attempt, "walk hit the step limit; regenerating");
                continue;
            };

            let metrics = DensityMetrics::measure(&maze.grid);
            if self.limits.accepts(metrics) {
                info!(
                    attempt,
                    total = metrics.total_sum,
                    inner = metrics.inner_sum,
                    "carved grid accepted"
                );
                return Ok(self.finish(maze, metrics, attempt, true));
            }

            let excess = self.limits.excess(metrics);
            debug!(
                attempt,
                total = metrics.total_sum,
                inner = metrics.inner_sum,
                excess,
                "density constraint failed; regenerating"
            );
            if best.as_ref().is_none_or(|(best_excess, _, _)| excess < *best_excess) {
                best = Some((excess, maze, metrics));
            }
        }

        let attempts = self.config.max_attempts;
        let Some((excess, maze, metrics)) = best else {
            return Err(DungeonError::CarveExhausted { attempts });
        };
        warn!(
            attempts,
            excess,
            total_limit = self.limits.total,
            inner_limit = self.limits.inner,
            "no carve met the density limits; keeping the least dense attempt"
        );
        Ok(self.finish(maze, metrics, attempts, false))
    }

    fn carve_attempt(&self, rng: &mut DungeonRng) -> Option<Maze> {
        let max_steps = self.config.max_walk_steps;
        let mut grid = Grid::new(self.config.small_size);
        grid.set(self.start, START_ROOM);
        grid.set(self.end, END_ROOM);

        if carve_primary_walk(&mut grid, self.start, rng, max_steps) == WalkOutcome::StepLimit {
            return None;
        }

        let mut pillar_anchors = Vec::with_capacity(self.config.pillar_count);
        for index in 0..self.config.pillar_count {
            let empty_rooms = rooms_with_code(&grid, EMPTY);
            if let Some(&anchor) = rng.choose(&empty_rooms) {
                let marker = branch_marker(index);
                if carve_branch_walk(&mut grid, anchor, marker, rng, max_steps)
                    == WalkOutcome::StepLimit
                {
                    return None;
                }
                grid.set(anchor, pillar_anchor(index));
                pillar_anchors.push(anchor);
                continue;
            }

            let generic_rooms = rooms_with_code(&grid, GENERIC_ROOM);
            match rng.choose(&generic_rooms) {
                Some(&anchor) => {
                    grid.set(anchor, pillar_anchor(index));
                    pillar_anchors.push(anchor);
                }
                None => debug!(index, "no room left for pillar anchor"),
            }
        }

        let breakable_rooms = tag_breakable_rooms(&mut grid, rng, self.config.breakable_rooms);

        grid.set(self.start, START_ROOM);
        grid.set(self.end, END_ROOM);
        Some(Maze { grid, pillar_anchors, breakable_rooms })
    }

    fn finish(
        &self,
        maze: Maze,
        density: DensityMetrics,
        attempts: u32,
        satisfied: bool,
    ) -> CarvedGrid {
        let offset = self.config.padding_offset();
        let start = self.start.offset_by(offset);
        let end = self.end.offset_by(offset);

        let mut grid = maze.grid.embed(self.config.big_size, offset);
        grid.set(start, START_ROOM);
        grid.set(end, END_ROOM);

        CarvedGrid {
            grid,
            start,
            end,
            pillar_anchors: maze.pillar_anchors.iter().map(|pos| pos.offset_by(offset)).collect(),
            breakable_rooms: maze.breakable_rooms.iter().map(|pos| pos.offset_by(offset)).collect(),
            report: CarveReport { attempts, satisfied, density, limits: self.limits },
        }
    }
}

fn rooms_with_code(grid: &Grid, code: i32) -> Vec<GridPos> {
    grid.positions().filter(|&pos| pos.is_room() && grid.value(pos) == code).collect()
}

/// Re-tags up to `count` generic dead-end rooms as breakable-wall rooms.
fn tag_breakable_rooms(grid: &mut Grid, rng: &mut DungeonRng, count: usize) -> Vec<GridPos> {
    let mut candidates: Vec<GridPos> = rooms_with_code(grid, GENERIC_ROOM)
        .into_iter()
        .filter(|&room| grid.hallway_directions(room).len() == 1)
        .collect();

    let mut tagged = Vec::new();
    while tagged.len() < count && !candidates.is_empty() {
        let room = candidates.swap_remove(rng.below(candidates.len()));
        grid.set(room, BREAKABLE_ROOM);
        tagged.push(room);
    }
    tagged.sort();
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::cell::CellKind;

    fn carve(config: &DungeonConfig, seed: u64) -> CarvedGrid {
        GridCarver::new(config).expect("valid config").carve(seed).expect("carve should finish")
    }

    #[test]
    fn reference_scenario_stamps_start_and_end_at_padded_offsets() {
        let config = DungeonConfig::default();
        let carved = carve(&config, 2024);

        assert!(carved.report.satisfied);
        assert_eq!(carved.grid.size(), 16);
        assert_eq!(carved.start, GridPos::new(6, 6));
        assert_eq!(carved.end, GridPos::new(10, 10));
        assert_eq!(carved.grid.value(carved.start), START_ROOM);
        assert_eq!(carved.grid.value(carved.end), END_ROOM);
    }

    #[test]
    fn every_room_is_reachable_from_start() {
        let config = DungeonConfig::default();
        for seed in 0..40 {
            let carved = carve(&config, seed);
            let reached = carved.grid.reachable_rooms(carved.start);
            for room in carved.grid.room_positions() {
                assert!(reached.contains(&room), "seed {seed}: {room:?} is cut off");
            }
        }
    }

    #[test]
    fn accepted_grids_respect_density_limits() {
        for difficulty in 1..=3 {
            let config = DungeonConfig { difficulty, ..DungeonConfig::default() };
            for seed in 0..20 {
                let carved = carve(&config, seed);
                if !carved.report.satisfied {
                    continue;
                }
                let total = carved.grid.sum() as f64;
                let inner = carved.grid.sum_of_code(GENERIC_ROOM) as f64;
                assert!(total <= 16.0 * 16.0 * 0.8 / f64::from(difficulty) * 1.5);
                assert!(inner <= 8.0 * 8.0 * 0.8 / f64::from(difficulty));
            }
        }
    }

    #[test]
    fn four_pillar_anchors_are_tagged_with_distinct_codes() {
        let config = DungeonConfig::default();
        for seed in 0..20 {
            let carved = carve(&config, seed);
            assert_eq!(carved.pillar_anchors.len(), 4, "seed {seed}");
            for (index, anchor) in carved.pillar_anchors.iter().enumerate() {
                assert_eq!(carved.grid.value(*anchor), pillar_anchor(index));
                assert_eq!(
                    CellKind::from_code(carved.grid.value(*anchor)),
                    Some(CellKind::Pillar(index as u8))
                );
            }
        }
    }

    #[test]
    fn breakable_rooms_are_dead_ends() {
        let config = DungeonConfig { breakable_rooms: 2, ..DungeonConfig::default() };
        for seed in 0..20 {
            let carved = carve(&config, seed);
            assert!(carved.breakable_rooms.len() <= 2);
            for room in &carved.breakable_rooms {
                assert_eq!(carved.grid.value(*room), BREAKABLE_ROOM);
                assert_eq!(carved.grid.hallway_directions(*room).len(), 1);
            }
        }
    }

    #[test]
    fn impossible_limits_fall_back_to_least_dense_attempt() {
        let config = DungeonConfig { difficulty: 50, max_attempts: 6, ..DungeonConfig::default() };
        let carved = carve(&config, 9);

        assert!(!carved.report.satisfied);
        assert_eq!(carved.report.attempts, 6);
        assert!(carved.report.density.total_sum as f64 > carved.report.limits.total);
        let reached = carved.grid.reachable_rooms(carved.start);
        assert!(reached.contains(&carved.end));
    }

    #[test]
    fn same_seed_carves_identical_grid() {
        let config = DungeonConfig { difficulty: 2, ..DungeonConfig::default() };
        let left = carve(&config, 31_337);
        let right = carve(&config, 31_337);
        assert_eq!(left.grid.fingerprint(), right.grid.fingerprint());
        assert_eq!(left.report.attempts, right.report.attempts);
    }

    #[test]
    fn exhausted_step_budget_is_an_error() {
        let config =
            DungeonConfig { max_walk_steps: 1, max_attempts: 3, ..DungeonConfig::default() };
        let result = GridCarver::new(&config).expect("valid config").carve(5);
        assert!(matches!(result, Err(DungeonError::CarveExhausted { attempts: 3 })));
    }
}
