//! Grid carving: random-walk maze generation with density-based regeneration.

pub mod cell;

mod carver;
mod grid;
pub(crate) mod seed;
mod walk;

pub use carver::{CarveReport, CarvedGrid, DensityLimits, DensityMetrics, GridCarver};
pub use cell::{Biome, CellKind, MAX_PILLARS};
pub use grid::Grid;

use crate::config::DungeonConfig;
use crate::error::DungeonError;

pub fn carve_grid(config: &DungeonConfig, seed: u64) -> Result<CarvedGrid, DungeonError> {
    GridCarver::new(config)?.carve(seed)
}
