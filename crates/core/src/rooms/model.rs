use slotmap::{SlotMap, new_key_type};

use crate::content::EnemyRecord;
use crate::mapgen::{Biome, CellKind};
use crate::templates::ContentCategory;
use crate::types::{Direction, GridPos, Pos, Rect, RoomId};

new_key_type! {
    pub struct ContentId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Door {
    pub direction: Direction,
    pub target: RoomId,
    /// Room-local opening in tile units.
    pub bounds: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Wall,
    Floor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u8,
    pub biome: Biome,
    pub bounds: Rect,
}

impl Tile {
    /// Sprite lookup key, e.g. `biome3/wall/1`.
    pub fn sprite_key(&self) -> String {
        let kind = match self.kind {
            TileKind::Wall => "wall",
            TileKind::Floor => "floor",
        };
        format!("biome{}/{kind}/{}", self.biome.number(), self.variant)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Enemy(EnemyRecord),
    Potion,
    Chest,
    Bomb,
    Trap,
    BreakableWall,
    Pillar,
    Exit,
}

impl Content {
    pub fn category(&self) -> ContentCategory {
        match self {
            Self::Enemy(_) => ContentCategory::Enemy,
            Self::Potion => ContentCategory::Potion,
            Self::Chest => ContentCategory::Chest,
            Self::Bomb => ContentCategory::Bomb,
            Self::Trap => ContentCategory::Trap,
            Self::BreakableWall => ContentCategory::BreakableWall,
            Self::Pillar => ContentCategory::Pillar,
            Self::Exit => ContentCategory::Exit,
        }
    }

    pub fn enemy(&self) -> Option<&EnemyRecord> {
        match self {
            Self::Enemy(record) => Some(record),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub content: Content,
    pub pos: Pos,
    /// False when the content came from a chance roll.
    pub guaranteed: bool,
}

#[derive(Clone, Debug)]
pub struct Room {
    pub(super) id: RoomId,
    pub(super) grid_pos: GridPos,
    pub(super) kind: CellKind,
    pub(super) template: String,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) doors: Vec<Door>,
    pub(super) walls: Vec<Tile>,
    pub(super) floors: Vec<Tile>,
    pub(super) contents: SlotMap<ContentId, Spawn>,
}

impl Room {
    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn grid_pos(&self) -> GridPos {
        self.grid_pos
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn biome(&self) -> Biome {
        self.kind.biome()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Tile dimensions as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn door_toward(&self, direction: Direction) -> Option<&Door> {
        self.doors.iter().find(|door| door.direction == direction)
    }

    pub fn walls(&self) -> &[Tile] {
        &self.walls
    }

    pub fn floors(&self) -> &[Tile] {
        &self.floors
    }

    pub fn contents(&self) -> impl Iterator<Item = (ContentId, &Spawn)> {
        self.contents.iter()
    }

    pub fn content(&self, id: ContentId) -> Option<&Spawn> {
        self.contents.get(id)
    }

    pub fn content_count(&self) -> usize {
        self.contents.len()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyRecord> {
        self.contents.values().filter_map(|spawn| spawn.content.enemy())
    }

    /// Removes consumed content. Other handles stay valid.
    pub fn take_content(&mut self, id: ContentId) -> Option<Spawn> {
        self.contents.remove(id)
    }
}
