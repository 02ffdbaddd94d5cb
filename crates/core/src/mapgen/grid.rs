//! Square integer grid carved by the maze generator.

use std::collections::{BTreeSet, VecDeque};

use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Direction, GridPos};

use super::cell::{EMPTY, GENERIC_ROOM, HALLWAY};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<i32>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![EMPTY; size * size] }
    }

    /// Builds a grid from explicit rows. Returns `None` unless the rows form
    /// a non-empty square.
    pub fn from_rows(rows: &[Vec<i32>]) -> Option<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self { size, cells: rows.concat() })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Out-of-bounds reads see an empty cell.
    pub fn value(&self, pos: GridPos) -> i32 {
        if !self.in_bounds(pos) {
            return EMPTY;
        }
        self.cells[pos.row * self.size + pos.col]
    }

    pub fn set(&mut self, pos: GridPos, value: i32) {
        if !self.in_bounds(pos) {
            return;
        }
        self.cells[pos.row * self.size + pos.col] = value;
    }

    pub fn neighbor(&self, pos: GridPos, direction: Direction, distance: usize) -> Option<GridPos> {
        pos.step(direction, distance, self.size)
    }

    /// True for even/even cells holding a room code.
    pub fn is_room(&self, pos: GridPos) -> bool {
        pos.is_room() && self.value(pos) >= GENERIC_ROOM
    }

    pub fn is_hallway(&self, pos: GridPos) -> bool {
        !pos.is_room() && self.value(pos) == HALLWAY
    }

    pub fn sum(&self) -> i64 {
        self.cells.iter().map(|&value| i64::from(value)).sum()
    }

    pub fn sum_of_code(&self, code: i32) -> i64 {
        self.cells.iter().filter(|&&value| value == code).map(|&value| i64::from(value)).sum()
    }

    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| GridPos { row, col }))
    }

    pub fn room_positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.positions().filter(|&pos| self.is_room(pos))
    }

    /// Hallway cells adjacent to a room cell.
    pub fn hallway_directions(&self, room: GridPos) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| {
                self.neighbor(room, direction, 1).is_some_and(|cell| self.is_hallway(cell))
            })
            .collect()
    }

    /// Copies this grid into a larger empty grid at `offset` on both axes.
    pub fn embed(&self, big_size: usize, offset: usize) -> Self {
        debug_assert!(offset + self.size <= big_size);
        let mut embedded = Self::new(big_size);
        for pos in self.positions() {
            embedded.set(pos.offset_by(offset), self.value(pos));
        }
        embedded
    }

    /// Room cells reachable from `start` by walking through hallway cells.
    pub fn reachable_rooms(&self, start: GridPos) -> BTreeSet<GridPos> {
        let mut reached = BTreeSet::new();
        if !self.is_room(start) {
            return reached;
        }

        let mut queue = VecDeque::from([start]);
        reached.insert(start);
        while let Some(room) = queue.pop_front() {
            for direction in self.hallway_directions(room) {
                let Some(next) = self.neighbor(room, direction, 2) else {
                    continue;
                };
                if self.is_room(next) && reached.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        reached
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + self.cells.len() * 4);
        bytes.extend((self.size as u32).to_le_bytes());
        for &value in &self.cells {
            bytes.extend(value.to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
