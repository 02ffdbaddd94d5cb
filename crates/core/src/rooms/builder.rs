use std::collections::BTreeMap;

use slotmap::SlotMap;
use tracing::{debug, info};

use crate::content::CharacterSource;
use crate::error::DungeonError;
use crate::mapgen::seed::DungeonRng;
use crate::mapgen::{Biome, CellKind, Grid};
use crate::templates::{RoomTemplate, TemplateRepository};
use crate::types::{GridPos, Rect, RoomId};

use super::RoomGraph;
use super::layout::{connections, doors, template_name};
use super::model::{Door, Room, Tile, TileKind};
use super::spawning::{door_barricades, roll_spawns};

/// Room content streams sit above every carve attempt stream.
const ROOM_STREAM_BASE: u64 = 1 << 32;

pub struct RoomGraphBuilder<'a> {
    templates: &'a TemplateRepository,
    characters: &'a dyn CharacterSource,
    seed: u64,
}

impl<'a> RoomGraphBuilder<'a> {
    pub fn new(
        templates: &'a TemplateRepository,
        characters: &'a dyn CharacterSource,
        seed: u64,
    ) -> Self {
        Self { templates, characters, seed }
    }

    pub fn build(&self, grid: &Grid) -> Result<RoomGraph, DungeonError> {
        let mut rooms = BTreeMap::new();
        for pos in grid.room_positions() {
            let Some(kind) = CellKind::from_code(grid.value(pos)) else {
                debug!(%pos, code = grid.value(pos), "unrecognised room code; skipped");
                continue;
            };
            let room = self.build_room(grid, pos, kind)?;
            rooms.insert(room.id, room);
        }

        info!(
            rooms = rooms.len(),
            contents = rooms.values().map(Room::content_count).sum::<usize>(),
            "room graph built"
        );
        Ok(RoomGraph { rooms, grid_width: grid.size() })
    }

    fn build_room(&self, grid: &Grid, pos: GridPos, kind: CellKind) -> Result<Room, DungeonError> {
        let id = RoomId::from_grid(pos, grid.size());
        let mut rng = DungeonRng::for_stream(self.seed, ROOM_STREAM_BASE + id.0 as u64);

        let links = connections(grid, pos);
        let directions: Vec<_> = links.iter().map(|&(direction, _)| direction).collect();
        let name = template_name(kind, &directions, &mut rng);
        let template = self
            .templates
            .get(&name)
            .ok_or_else(|| DungeonError::MissingTemplate { name: name.clone(), room: id })?;

        let (width, height) = (template.width(), template.height());
        let doors = doors(&links, width, height);
        let biome = kind.biome();
        let (walls, floors) = tiles(template, &doors, biome);

        let mut spawns = roll_spawns(template, biome, self.characters, &mut rng);
        if kind == CellKind::BreakableWall {
            spawns.extend(door_barricades(&doors));
        }
        let mut contents = SlotMap::with_key();
        for spawn in spawns {
            contents.insert(spawn);
        }

        Ok(Room {
            id,
            grid_pos: pos,
            kind,
            template: name,
            width,
            height,
            doors,
            walls,
            floors,
            contents,
        })
    }
}

/// Walls that would block a door are dropped; every floor cell is kept.
fn tiles(template: &RoomTemplate, doors: &[Door], biome: Biome) -> (Vec<Tile>, Vec<Tile>) {
    let walls = template
        .walls()
        .map(|(pos, variant)| Tile {
            kind: TileKind::Wall,
            variant,
            biome,
            bounds: Rect::unit(pos),
        })
        .filter(|tile| doors.iter().all(|door| !door.bounds.intersects(&tile.bounds)))
        .collect();
    let floors = template
        .floors()
        .map(|(pos, variant)| Tile {
            kind: TileKind::Floor,
            variant,
            biome,
            bounds: Rect::unit(pos),
        })
        .collect();
    (walls, floors)
}
