//! Room templates: wall layout, floor tileset, spawn codes and spawn chances.

mod model;
mod repository;

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use toml::de;

pub use model::{
    ContentCategory, FloorCell, MIN_TEMPLATE_SIDE, RoomTemplate, SpawnChances, SpawnCode,
    SpawnRule, WallCell,
};
pub use repository::TemplateRepository;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not read templates '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid template TOML: {0}")]
    Parse(#[from] de::Error),
    #[error("template '{name}' extends unknown template '{parent}'")]
    UnknownParent { name: String, parent: String },
    #[error("template '{name}' inherits from itself")]
    InheritanceCycle { name: String },
    #[error("template '{name}' has no {grid} grid")]
    MissingGrid { name: String, grid: &'static str },
    #[error("template '{name}' {grid} row {row}: '{token}' is not a cell code")]
    BadCell { name: String, grid: &'static str, row: usize, token: String },
    #[error("template '{name}' {grid} grid is ragged at row {row}")]
    RaggedGrid { name: String, grid: &'static str, row: usize },
    #[error(
        "template '{name}' {grid} grid is {found_width}x{found_height}, expected {width}x{height}"
    )]
    DimensionMismatch {
        name: String,
        grid: &'static str,
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },
    #[error("template '{name}' must be at least {min}x{min}, got {width}x{height}")]
    TooSmall { name: String, width: usize, height: usize, min: usize },
}
