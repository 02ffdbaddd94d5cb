use std::fmt;

use serde::{Deserialize, Serialize};

/// Room-local tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

/// Coordinate of a cell in the dungeon grid. Even/even cells are rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_room(self) -> bool {
        self.row % 2 == 0 && self.col % 2 == 0
    }

    /// Moves `distance` cells toward `direction`, or `None` when the result
    /// would leave a `size` x `size` grid.
    pub fn step(self, direction: Direction, distance: usize, size: usize) -> Option<Self> {
        let row = match direction {
            Direction::North => self.row.checked_sub(distance)?,
            Direction::South => self.row + distance,
            Direction::East | Direction::West => self.row,
        };
        let col = match direction {
            Direction::West => self.col.checked_sub(distance)?,
            Direction::East => self.col + distance,
            Direction::North | Direction::South => self.col,
        };
        (row < size && col < size).then_some(Self { row, col })
    }

    pub fn offset_by(self, offset: usize) -> Self {
        Self { row: self.row + offset, col: self.col + offset }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(pub usize);

impl RoomId {
    pub fn from_grid(pos: GridPos, grid_width: usize) -> Self {
        Self(pos.row * grid_width + pos.col)
    }

    pub fn grid_pos(self, grid_width: usize) -> GridPos {
        GridPos { row: self.0 / grid_width, col: self.0 % grid_width }
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::East => "EAST",
            Self::South => "SOUTH",
            Self::West => "WEST",
        }
    }
}

/// Axis-aligned rectangle in room-local tile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn unit(pos: Pos) -> Self {
        Self { x: pos.x, y: pos.y, width: 1, height: 1 }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    pub fn center(&self) -> Pos {
        Pos { y: self.y + self.height / 2, x: self.x + self.width / 2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_refuses_to_leave_the_grid() {
        let corner = GridPos::new(0, 0);
        assert_eq!(corner.step(Direction::North, 2, 8), None);
        assert_eq!(corner.step(Direction::West, 1, 8), None);
        assert_eq!(corner.step(Direction::South, 2, 8), Some(GridPos::new(2, 0)));
        assert_eq!(GridPos::new(6, 6).step(Direction::East, 2, 8), None);
    }

    #[test]
    fn room_id_round_trips_through_grid_position() {
        let pos = GridPos::new(6, 10);
        let id = RoomId::from_grid(pos, 16);
        assert_eq!(id, RoomId(106));
        assert_eq!(id.grid_pos(16), pos);
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let left = Rect { x: 0, y: 0, width: 2, height: 2 };
        let right = Rect { x: 2, y: 0, width: 2, height: 2 };
        let overlapping = Rect { x: 1, y: 1, width: 2, height: 2 };
        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }
}
