//! Decoded room templates: layout grids and spawn probabilities.

use serde::{Deserialize, Serialize};

use crate::types::Pos;

pub const MIN_TEMPLATE_SIDE: usize = 5;

const ENEMY_DELTA_PER_LEVEL: i32 = 5;
const POTION_DELTA_PER_LEVEL: i32 = -3;
const CHEST_DELTA_PER_LEVEL: i32 = -3;
const BOMB_DELTA_PER_LEVEL: i32 = -2;
const TRAP_DELTA_PER_LEVEL: i32 = 4;
const BREAKABLE_WALL_DELTA_PER_LEVEL: i32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallCell {
    Open,
    Wall(u8),
}

impl WallCell {
    pub fn decode(code: u8) -> Self {
        if code == 0 { Self::Open } else { Self::Wall(code) }
    }
}

/// Tileset variant for one floor cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorCell(pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentCategory {
    Enemy,
    Potion,
    Chest,
    Bomb,
    Trap,
    BreakableWall,
    Pillar,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnRule {
    Guaranteed(ContentCategory),
    Random(ContentCategory),
}

/// Spawn-grid cell. The discriminant is the code used in template files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpawnCode {
    Empty = 0,
    Enemy = 1,
    Potion = 2,
    Chest = 3,
    Bomb = 4,
    Trap = 5,
    BreakableWall = 6,
    RandomEnemy = 11,
    RandomPotion = 12,
    RandomChest = 13,
    RandomBomb = 14,
    RandomTrap = 15,
    RandomBreakableWall = 16,
    Pillar = 20,
    Exit = 21,
}

impl SpawnCode {
    pub fn decode(code: u8) -> Option<Self> {
        let decoded = match code {
            0 => Self::Empty,
            1 => Self::Enemy,
            2 => Self::Potion,
            3 => Self::Chest,
            4 => Self::Bomb,
            5 => Self::Trap,
            6 => Self::BreakableWall,
            11 => Self::RandomEnemy,
            12 => Self::RandomPotion,
            13 => Self::RandomChest,
            14 => Self::RandomBomb,
            15 => Self::RandomTrap,
            16 => Self::RandomBreakableWall,
            20 => Self::Pillar,
            21 => Self::Exit,
            _ => return None,
        };
        Some(decoded)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn rule(self) -> Option<SpawnRule> {
        use ContentCategory as C;
        use SpawnRule::{Guaranteed, Random};

        let rule = match self {
            Self::Empty => return None,
            Self::Enemy => Guaranteed(C::Enemy),
            Self::Potion => Guaranteed(C::Potion),
            Self::Chest => Guaranteed(C::Chest),
            Self::Bomb => Guaranteed(C::Bomb),
            Self::Trap => Guaranteed(C::Trap),
            Self::BreakableWall => Guaranteed(C::BreakableWall),
            Self::Pillar => Guaranteed(C::Pillar),
            Self::Exit => Guaranteed(C::Exit),
            Self::RandomEnemy => Random(C::Enemy),
            Self::RandomPotion => Random(C::Potion),
            Self::RandomChest => Random(C::Chest),
            Self::RandomBomb => Random(C::Bomb),
            Self::RandomTrap => Random(C::Trap),
            Self::RandomBreakableWall => Random(C::BreakableWall),
        };
        Some(rule)
    }
}

/// Percent chances (0..=100) that a random spawn cell produces content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnChances {
    pub enemy: u32,
    pub potion: u32,
    pub chest: u32,
    pub bomb: u32,
    pub trap: u32,
    pub breakable_wall: u32,
}

impl SpawnChances {
    pub fn adjusted_for(self, difficulty: u32) -> Self {
        let levels = i64::from(difficulty.saturating_sub(1));
        let shift = |base: u32, delta: i32| {
            (i64::from(base) + i64::from(delta) * levels).clamp(0, 100) as u32
        };
        Self {
            enemy: shift(self.enemy, ENEMY_DELTA_PER_LEVEL),
            potion: shift(self.potion, POTION_DELTA_PER_LEVEL),
            chest: shift(self.chest, CHEST_DELTA_PER_LEVEL),
            bomb: shift(self.bomb, BOMB_DELTA_PER_LEVEL),
            trap: shift(self.trap, TRAP_DELTA_PER_LEVEL),
            breakable_wall: shift(self.breakable_wall, BREAKABLE_WALL_DELTA_PER_LEVEL),
        }
    }

    /// Landmarks are never rolled.
    pub fn chance(&self, category: ContentCategory) -> u32 {
        match category {
            ContentCategory::Enemy => self.enemy,
            ContentCategory::Potion => self.potion,
            ContentCategory::Chest => self.chest,
            ContentCategory::Bomb => self.bomb,
            ContentCategory::Trap => self.trap,
            ContentCategory::BreakableWall => self.breakable_wall,
            ContentCategory::Pillar | ContentCategory::Exit => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomTemplate {
    name: String,
    width: usize,
    height: usize,
    walls: Vec<WallCell>,
    floors: Vec<FloorCell>,
    spawns: Vec<SpawnCode>,
    chances: SpawnChances,
}

impl RoomTemplate {
    pub(super) fn new(
        name: String,
        width: usize,
        height: usize,
        walls: Vec<WallCell>,
        floors: Vec<FloorCell>,
        spawns: Vec<SpawnCode>,
        chances: SpawnChances,
    ) -> Self {
        debug_assert_eq!(walls.len(), width * height);
        debug_assert_eq!(floors.len(), width * height);
        debug_assert_eq!(spawns.len(), width * height);
        Self { name, width, height, walls, floors, spawns, chances }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn chances(&self) -> SpawnChances {
        self.chances
    }

    pub fn wall_at(&self, pos: Pos) -> WallCell {
        self.index(pos).map_or(WallCell::Open, |index| self.walls[index])
    }

    pub fn spawn_at(&self, pos: Pos) -> SpawnCode {
        self.index(pos).map_or(SpawnCode::Empty, |index| self.spawns[index])
    }

    /// Every wall cell with its variant code.
    pub fn walls(&self) -> impl Iterator<Item = (Pos, u8)> + '_ {
        self.cells(&self.walls).filter_map(|(pos, cell)| match cell {
            WallCell::Wall(variant) => Some((pos, *variant)),
            WallCell::Open => None,
        })
    }

    pub fn floors(&self) -> impl Iterator<Item = (Pos, u8)> + '_ {
        self.cells(&self.floors).map(|(pos, FloorCell(variant))| (pos, *variant))
    }

    /// Every non-empty spawn cell.
    pub fn spawns(&self) -> impl Iterator<Item = (Pos, SpawnCode)> + '_ {
        self.cells(&self.spawns)
            .filter(|(_, code)| **code != SpawnCode::Empty)
            .map(|(pos, code)| (pos, *code))
    }

    fn cells<'a, T>(&'a self, layer: &'a [T]) -> impl Iterator<Item = (Pos, &'a T)> + 'a {
        let width = self.width;
        layer.iter().enumerate().map(move |(index, cell)| {
            (Pos { y: (index / width) as i32, x: (index % width) as i32 }, cell)
        })
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_codes_round_trip_through_discriminant() {
        for code in 0..=u8::MAX {
            if let Some(decoded) = SpawnCode::decode(code) {
                assert_eq!(decoded.code(), code);
            }
        }
        assert_eq!(SpawnCode::decode(7), None);
        assert_eq!(SpawnCode::decode(99), None);
    }

    #[test]
    fn spawn_codes_split_into_guaranteed_and_random_families() {
        assert_eq!(SpawnCode::Empty.rule(), None);
        assert_eq!(SpawnCode::Chest.rule(), Some(SpawnRule::Guaranteed(ContentCategory::Chest)));
        assert_eq!(SpawnCode::RandomTrap.rule(), Some(SpawnRule::Random(ContentCategory::Trap)));
        assert_eq!(SpawnCode::Exit.rule(), Some(SpawnRule::Guaranteed(ContentCategory::Exit)));
    }

    #[test]
    fn difficulty_shifts_each_category_by_its_fixed_delta() {
        let base = SpawnChances {
            enemy: 40,
            potion: 30,
            chest: 30,
            bomb: 20,
            trap: 10,
            breakable_wall: 25,
        };
        assert_eq!(base.adjusted_for(1), base);

        let hard = base.adjusted_for(3);
        assert_eq!(hard.enemy, 50);
        assert_eq!(hard.potion, 24);
        assert_eq!(hard.chest, 24);
        assert_eq!(hard.bomb, 16);
        assert_eq!(hard.trap, 18);
        assert_eq!(hard.breakable_wall, 25);
    }

    #[test]
    fn adjusted_chances_clamp_to_percent_range() {
        let base = SpawnChances { enemy: 95, potion: 5, ..SpawnChances::default() };
        let brutal = base.adjusted_for(20);
        assert_eq!(brutal.enemy, 100);
        assert_eq!(brutal.potion, 0);
        assert_eq!(brutal.chance(ContentCategory::Pillar), 0);
    }

    #[test]
    fn oversized_chances_clamp_instead_of_wrapping() {
        let base = SpawnChances { enemy: u32::MAX, potion: u32::MAX, ..SpawnChances::default() };
        let easy = base.adjusted_for(1);
        assert_eq!(easy.enemy, 100);
        assert_eq!(easy.potion, 100);

        let base = SpawnChances { potion: 5, trap: 5, ..SpawnChances::default() };
        let endless = base.adjusted_for(u32::MAX);
        assert_eq!(endless.potion, 0);
        assert_eq!(endless.trap, 100);
    }

    #[test]
    fn cell_lookups_outside_the_template_read_as_empty() {
        let template = RoomTemplate::new(
            "TINY".to_string(),
            2,
            2,
            vec![WallCell::Wall(3), WallCell::Open, WallCell::Open, WallCell::Wall(1)],
            vec![FloorCell(1); 4],
            vec![SpawnCode::Chest, SpawnCode::Empty, SpawnCode::Empty, SpawnCode::Empty],
            SpawnChances::default(),
        );

        assert_eq!(template.wall_at(Pos { x: 0, y: 0 }), WallCell::Wall(3));
        assert_eq!(template.wall_at(Pos { x: 1, y: 1 }), WallCell::Wall(1));
        assert_eq!(template.wall_at(Pos { x: 1, y: 0 }), WallCell::Open);
        assert_eq!(template.wall_at(Pos { x: -1, y: 0 }), WallCell::Open);
        assert_eq!(template.wall_at(Pos { x: 2, y: 1 }), WallCell::Open);
        assert_eq!(template.spawn_at(Pos { x: 0, y: 0 }), SpawnCode::Chest);
        assert_eq!(template.spawn_at(Pos { x: 0, y: 5 }), SpawnCode::Empty);
        assert_eq!(template.walls().count(), 2);
    }
}
