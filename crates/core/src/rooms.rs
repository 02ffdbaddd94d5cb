//! Room graph: typed rooms with doors, tiles and spawned content built from
//! a carved grid.

mod builder;
mod layout;
mod model;
mod spawning;

use std::collections::BTreeMap;

pub use builder::RoomGraphBuilder;
pub use model::{Content, ContentId, Door, Room, Spawn, Tile, TileKind};

use crate::types::{GridPos, RoomId};

#[derive(Clone, Debug)]
pub struct RoomGraph {
    rooms: BTreeMap<RoomId, Room>,
    grid_width: usize,
}

impl RoomGraph {
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn room_at(&self, pos: GridPos) -> Option<&Room> {
        if pos.col >= self.grid_width {
            return None;
        }
        self.get(RoomId::from_grid(pos, self.grid_width))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }
}
