//! Cell codes stored in the dungeon grid and their decoded room kinds.

pub const EMPTY: i32 = 0;
pub const HALLWAY: i32 = 1;
pub const GENERIC_ROOM: i32 = 2;
pub const START_ROOM: i32 = 9;
pub const END_ROOM: i32 = 10;
pub const BREAKABLE_ROOM: i32 = 11;

pub const MAX_PILLARS: usize = 4;

const BRANCH_MARKER_BASE: i32 = 3;
const PILLAR_ANCHOR_BASE: i32 = 13;

pub fn branch_marker(index: usize) -> i32 {
    debug_assert!(index < MAX_PILLARS);
    BRANCH_MARKER_BASE + index as i32
}

pub fn pillar_anchor(index: usize) -> i32 {
    debug_assert!(index < MAX_PILLARS);
    PILLAR_ANCHOR_BASE + index as i32
}

/// Thematic bucket driving tile sprites and enemy selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Biome {
    Wilds,
    Warren,
    Crypt,
    Stronghold,
    Lair,
}

impl Biome {
    pub fn number(self) -> u8 {
        match self {
            Self::Wilds => 1,
            Self::Warren => 2,
            Self::Crypt => 3,
            Self::Stronghold => 4,
            Self::Lair => 5,
        }
    }

    fn for_branch(index: u8) -> Self {
        match index {
            0 => Self::Warren,
            1 => Self::Crypt,
            2 => Self::Stronghold,
            _ => Self::Lair,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Generic,
    Branch(u8),
    Start,
    End,
    BreakableWall,
    Pillar(u8),
}

impl CellKind {
    /// Decodes a room cell value. Hallways, empty cells, and unused codes
    /// are not rooms.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            GENERIC_ROOM => Some(Self::Generic),
            3..=6 => Some(Self::Branch((code - BRANCH_MARKER_BASE) as u8)),
            START_ROOM => Some(Self::Start),
            END_ROOM => Some(Self::End),
            BREAKABLE_ROOM => Some(Self::BreakableWall),
            13..=16 => Some(Self::Pillar((code - PILLAR_ANCHOR_BASE) as u8)),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Generic => GENERIC_ROOM,
            Self::Branch(index) => branch_marker(index as usize),
            Self::Start => START_ROOM,
            Self::End => END_ROOM,
            Self::BreakableWall => BREAKABLE_ROOM,
            Self::Pillar(index) => pillar_anchor(index as usize),
        }
    }

    pub fn biome(self) -> Biome {
        match self {
            Self::Generic | Self::Start | Self::End | Self::BreakableWall => Biome::Wilds,
            Self::Branch(index) | Self::Pillar(index) => Biome::for_branch(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_room_code_round_trips() {
        for code in [2, 3, 4, 5, 6, 9, 10, 11, 13, 14, 15, 16] {
            let kind = CellKind::from_code(code).expect("room code should decode");
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn hallway_empty_and_unused_codes_are_not_rooms() {
        for code in [0, 1, 7, 8, 12, 17, -1] {
            assert_eq!(CellKind::from_code(code), None, "code {code}");
        }
    }

    #[test]
    fn branch_and_pillar_share_a_biome() {
        for index in 0..MAX_PILLARS as u8 {
            assert_eq!(CellKind::Branch(index).biome(), CellKind::Pillar(index).biome());
        }
        assert_eq!(CellKind::Pillar(3).biome(), Biome::Lair);
        assert_eq!(CellKind::Start.biome().number(), 1);
    }
}
