//! One playthrough: carved grid, room graph and fog-of-war state.

use tracing::{info, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::DungeonConfig;
use crate::content::CharacterSource;
use crate::error::DungeonError;
use crate::mapgen::{CarveReport, CarvedGrid, Grid, GridCarver};
use crate::rooms::{Room, RoomGraph, RoomGraphBuilder};
use crate::templates::TemplateRepository;
use crate::types::{Direction, GridPos, RoomId};
use crate::visibility::{VisibilityGraph, VisibilityView};

pub struct Dungeon {
    seed: u64,
    carved: CarvedGrid,
    rooms: RoomGraph,
    visibility: VisibilityGraph,
    current: RoomId,
}

impl Dungeon {
    pub fn generate(
        config: &DungeonConfig,
        templates: &TemplateRepository,
        characters: &dyn CharacterSource,
        seed: u64,
    ) -> Result<Self, DungeonError> {
        if templates.difficulty() != config.difficulty {
            warn!(
                templates = templates.difficulty(),
                config = config.difficulty,
                "template chances were adjusted for a different difficulty"
            );
        }

        let carved = GridCarver::new(config)?.carve(seed)?;
        let rooms = RoomGraphBuilder::new(templates, characters, seed).build(&carved.grid)?;
        let visibility = VisibilityGraph::new(&carved.grid, carved.start, config.vision_range);
        let current = RoomId::from_grid(carved.start, carved.grid.size());

        let dungeon = Self { seed, carved, rooms, visibility, current };
        info!(
            seed,
            rooms = dungeon.rooms.len(),
            attempts = dungeon.carved.report.attempts,
            satisfied = dungeon.carved.report.satisfied,
            fingerprint = dungeon.fingerprint(),
            "dungeon generated"
        );
        Ok(dungeon)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.carved.grid
    }

    pub fn carved(&self) -> &CarvedGrid {
        &self.carved
    }

    pub fn report(&self) -> &CarveReport {
        &self.carved.report
    }

    pub fn rooms(&self) -> &RoomGraph {
        &self.rooms
    }

    /// Gameplay collaborators remove consumed content through this.
    pub fn rooms_mut(&mut self) -> &mut RoomGraph {
        &mut self.rooms
    }

    pub fn visibility(&self) -> &VisibilityGraph {
        &self.visibility
    }

    pub fn start_room(&self) -> RoomId {
        RoomId::from_grid(self.carved.start, self.grid_width())
    }

    pub fn end_room(&self) -> RoomId {
        RoomId::from_grid(self.carved.end, self.grid_width())
    }

    pub fn current_room_id(&self) -> RoomId {
        self.current
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.rooms.get(self.current)
    }

    pub fn current_position(&self) -> GridPos {
        self.visibility.current_position()
    }

    pub fn is_room(&self, pos: GridPos) -> bool {
        self.visibility.is_room(self.grid(), pos)
    }

    pub fn hallway_leads_to_visible(&self, pos: GridPos) -> bool {
        self.visibility.hallway_leads_to_visible(self.grid(), pos)
    }

    /// Moves the player into `room` and recomputes what the minimap shows.
    pub fn enter_room(&mut self, room: RoomId) -> Result<&VisibilityView, DungeonError> {
        if self.rooms.get(room).is_none() {
            return Err(DungeonError::UnknownRoom(room));
        }
        self.current = room;
        let pos = room.grid_pos(self.grid_width());
        Ok(self.visibility.update(&self.carved.grid, pos))
    }

    /// Walks through the current room's door on `direction`.
    pub fn travel(&mut self, direction: Direction) -> Result<RoomId, DungeonError> {
        let target = self
            .current_room()
            .and_then(|room| room.door_toward(direction))
            .map(|door| door.target)
            .ok_or(DungeonError::NoDoor { room: self.current, direction })?;
        self.enter_room(target)?;
        Ok(target)
    }

    /// Stable 64-bit identity of the generated layout and its content.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = self.carved.grid.canonical_bytes();
        for room in self.rooms.iter() {
            bytes.extend((room.id().0 as u32).to_le_bytes());
            bytes.extend(room.template().as_bytes());
            for (_, spawn) in room.contents() {
                bytes.push(spawn.content.category() as u8);
                bytes.extend(spawn.pos.y.to_le_bytes());
                bytes.extend(spawn.pos.x.to_le_bytes());
                if let Some(enemy) = spawn.content.enemy() {
                    bytes.extend(enemy.name.as_bytes());
                }
            }
        }
        xxh3_64(&bytes)
    }

    fn grid_width(&self) -> usize {
        self.carved.grid.size()
    }
}
