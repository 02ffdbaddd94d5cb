//! TOML-backed template repository with single-parent inheritance.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::TemplateError;
use super::model::{FloorCell, MIN_TEMPLATE_SIDE, RoomTemplate, SpawnChances, SpawnCode, WallCell};

const BUILTIN_TEMPLATES: &str = include_str!("../../assets/room_templates.toml");

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    #[serde(default)]
    templates: BTreeMap<String, RawTemplate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplate {
    extends: Option<String>,
    walls: Option<Vec<String>>,
    floors: Option<Vec<String>>,
    spawns: Option<Vec<String>>,
    #[serde(default)]
    chances: RawChances,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChances {
    enemy: Option<u32>,
    potion: Option<u32>,
    chest: Option<u32>,
    bomb: Option<u32>,
    trap: Option<u32>,
    breakable_wall: Option<u32>,
}

impl RawChances {
    fn overlay(self, child: Self) -> Self {
        Self {
            enemy: child.enemy.or(self.enemy),
            potion: child.potion.or(self.potion),
            chest: child.chest.or(self.chest),
            bomb: child.bomb.or(self.bomb),
            trap: child.trap.or(self.trap),
            breakable_wall: child.breakable_wall.or(self.breakable_wall),
        }
    }

    fn resolve(self) -> SpawnChances {
        SpawnChances {
            enemy: self.enemy.unwrap_or(0).min(100),
            potion: self.potion.unwrap_or(0).min(100),
            chest: self.chest.unwrap_or(0).min(100),
            bomb: self.bomb.unwrap_or(0).min(100),
            trap: self.trap.unwrap_or(0).min(100),
            breakable_wall: self.breakable_wall.unwrap_or(0).min(100),
        }
    }
}

/// A template after its `extends` chain has been flattened.
#[derive(Clone, Copy, Default)]
struct Flattened<'a> {
    walls: Option<&'a [String]>,
    floors: Option<&'a [String]>,
    spawns: Option<&'a [String]>,
    chances: RawChances,
}

struct Layer {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

/// Immutable set of decoded templates whose spawn chances are already
/// adjusted for one difficulty level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateRepository {
    templates: BTreeMap<String, RoomTemplate>,
    difficulty: u32,
}

impl TemplateRepository {
    /// Templates compiled into the crate.
    pub fn builtin(difficulty: u32) -> Result<Self, TemplateError> {
        Self::from_toml_str(BUILTIN_TEMPLATES, difficulty)
    }

    pub fn load(path: &Path, difficulty: u32) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path)
            .map_err(|source| TemplateError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text, difficulty)
    }

    pub fn from_toml_str(text: &str, difficulty: u32) -> Result<Self, TemplateError> {
        let file: TemplateFile = toml::from_str(text)?;
        let mut templates = BTreeMap::new();
        for name in file.templates.keys() {
            let flattened = flatten(name, &file.templates, &mut Vec::new())?;
            let template = decode(name, flattened, difficulty)?;
            templates.insert(name.clone(), template);
        }
        debug!(count = templates.len(), difficulty, "loaded room templates");
        Ok(Self { templates, difficulty })
    }

    pub fn get(&self, name: &str) -> Option<&RoomTemplate> {
        self.templates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }
}

fn flatten<'a>(
    name: &str,
    raw: &'a BTreeMap<String, RawTemplate>,
    chain: &mut Vec<String>,
) -> Result<Flattened<'a>, TemplateError> {
    if chain.iter().any(|seen| seen == name) {
        return Err(TemplateError::InheritanceCycle { name: name.to_string() });
    }
    let Some(template) = raw.get(name) else {
        let child = chain.last().cloned().unwrap_or_default();
        return Err(TemplateError::UnknownParent { name: child, parent: name.to_string() });
    };
    chain.push(name.to_string());

    let parent = match &template.extends {
        Some(parent) => flatten(parent, raw, chain)?,
        None => Flattened::default(),
    };
    chain.pop();

    Ok(Flattened {
        walls: template.walls.as_deref().or(parent.walls),
        floors: template.floors.as_deref().or(parent.floors),
        spawns: template.spawns.as_deref().or(parent.spawns),
        chances: parent.chances.overlay(template.chances),
    })
}

fn decode(name: &str, flat: Flattened<'_>, difficulty: u32) -> Result<RoomTemplate, TemplateError> {
    let walls = parse_layer(name, "walls", flat.walls)?;
    let floors = parse_layer(name, "floors", flat.floors)?;
    let spawns = parse_layer(name, "spawns", flat.spawns)?;

    if walls.width < MIN_TEMPLATE_SIDE || walls.height < MIN_TEMPLATE_SIDE {
        return Err(TemplateError::TooSmall {
            name: name.to_string(),
            width: walls.width,
            height: walls.height,
            min: MIN_TEMPLATE_SIDE,
        });
    }
    for (grid, layer) in [("floors", &floors), ("spawns", &spawns)] {
        if layer.width != walls.width || layer.height != walls.height {
            return Err(TemplateError::DimensionMismatch {
                name: name.to_string(),
                grid,
                width: walls.width,
                height: walls.height,
                found_width: layer.width,
                found_height: layer.height,
            });
        }
    }

    let spawn_cells = spawns
        .cells
        .iter()
        .map(|&code| {
            SpawnCode::decode(code).unwrap_or_else(|| {
                debug!(template = name, code, "unknown spawn code treated as empty");
                SpawnCode::Empty
            })
        })
        .collect();

    Ok(RoomTemplate::new(
        name.to_string(),
        walls.width,
        walls.height,
        walls.cells.iter().map(|&code| WallCell::decode(code)).collect(),
        floors.cells.iter().map(|&code| FloorCell(code)).collect(),
        spawn_cells,
        flat.chances.resolve().adjusted_for(difficulty),
    ))
}

fn parse_layer(
    name: &str,
    grid: &'static str,
    rows: Option<&[String]>,
) -> Result<Layer, TemplateError> {
    let rows = rows.ok_or_else(|| TemplateError::MissingGrid { name: name.to_string(), grid })?;
    let mut cells = Vec::new();
    let mut width = 0;

    for (row_index, row) in rows.iter().enumerate() {
        let mut row_width = 0;
        for token in row.split_whitespace() {
            let code = token.parse::<u8>().map_err(|_| TemplateError::BadCell {
                name: name.to_string(),
                grid,
                row: row_index,
                token: token.to_string(),
            })?;
            cells.push(code);
            row_width += 1;
        }
        if row_index == 0 {
            width = row_width;
        } else if row_width != width {
            return Err(TemplateError::RaggedGrid { name: name.to_string(), grid, row: row_index });
        }
    }

    Ok(Layer { width, height: rows.len(), cells })
}
