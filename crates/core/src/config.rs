//! Generation settings for one playthrough.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toml::de;

use crate::mapgen::MAX_PILLARS;
use crate::types::GridPos;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] de::Error),
    #[error("maze size must be at least 3, got {0}")]
    MazeTooSmall(usize),
    #[error("padded size {big} is smaller than maze size {small}")]
    PaddingTooSmall { small: usize, big: usize },
    #[error("difficulty must be at least 1")]
    ZeroDifficulty,
    #[error("{label} room {pos} must sit on even coordinates inside the {size}x{size} maze")]
    RoomOutOfPlace { label: &'static str, pos: GridPos, size: usize },
    #[error("start and end rooms both sit at {0}")]
    StartIsEnd(GridPos),
    #[error("at most {max} pillars are supported, got {requested}")]
    TooManyPillars { requested: usize, max: usize },
    #[error("{0} must be at least 1")]
    ZeroBudget(&'static str),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DungeonConfig {
    pub start: GridPos,
    /// Defaults to the maze corner farthest from `start`.
    pub end: Option<GridPos>,
    pub small_size: usize,
    pub big_size: usize,
    pub pillar_count: usize,
    pub difficulty: u32,
    pub max_attempts: u32,
    pub max_walk_steps: u32,
    pub breakable_rooms: usize,
    pub vision_range: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            start: GridPos::new(2, 2),
            end: None,
            small_size: 8,
            big_size: 16,
            pillar_count: MAX_PILLARS,
            difficulty: 1,
            max_attempts: 500,
            max_walk_steps: 10_000,
            breakable_rooms: 1,
            vision_range: 2,
        }
    }
}

impl DungeonConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_size < 3 {
            return Err(ConfigError::MazeTooSmall(self.small_size));
        }
        if self.big_size < self.small_size {
            return Err(ConfigError::PaddingTooSmall {
                small: self.small_size,
                big: self.big_size,
            });
        }
        if self.difficulty == 0 {
            return Err(ConfigError::ZeroDifficulty);
        }
        if self.pillar_count > MAX_PILLARS {
            return Err(ConfigError::TooManyPillars {
                requested: self.pillar_count,
                max: MAX_PILLARS,
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroBudget("max_attempts"));
        }
        if self.max_walk_steps == 0 {
            return Err(ConfigError::ZeroBudget("max_walk_steps"));
        }
        self.check_room("start", self.start)?;
        let end = self.end_room();
        self.check_room("end", end)?;
        if end == self.start {
            return Err(ConfigError::StartIsEnd(end));
        }
        Ok(())
    }

    pub fn end_room(&self) -> GridPos {
        self.end.unwrap_or_else(|| {
            let last = (self.small_size - 1) & !1;
            let far = |index: usize| if index * 2 < last { last } else { 0 };
            GridPos::new(far(self.start.row), far(self.start.col))
        })
    }

    /// Even offset that centers the maze inside the padded grid.
    pub fn padding_offset(&self) -> usize {
        ((self.big_size - self.small_size) / 2) & !1
    }

    fn check_room(&self, label: &'static str, pos: GridPos) -> Result<(), ConfigError> {
        if pos.is_room() && pos.row < self.small_size && pos.col < self.small_size {
            Ok(())
        } else {
            Err(ConfigError::RoomOutOfPlace { label, pos, size: self.small_size })
        }
    }
}
