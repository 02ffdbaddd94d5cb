pub mod config;
pub mod content;
pub mod dungeon;
pub mod error;
pub mod mapgen;
pub mod rooms;
pub mod templates;
pub mod types;
pub mod visibility;

pub use config::{ConfigError, DungeonConfig};
pub use content::{CharacterRoster, CharacterSource, EnemyClass, EnemyRecord, RosterError};
pub use dungeon::Dungeon;
pub use error::DungeonError;
pub use mapgen::{Biome, CarveReport, CarvedGrid, CellKind, Grid, GridCarver, carve_grid};
pub use rooms::{Content, ContentId, Door, Room, RoomGraph, RoomGraphBuilder, Spawn, Tile, TileKind};
pub use templates::{RoomTemplate, SpawnChances, SpawnCode, TemplateError, TemplateRepository};
pub use types::*;
pub use visibility::{VisibilityGraph, VisibilityView, compute_visibility};
