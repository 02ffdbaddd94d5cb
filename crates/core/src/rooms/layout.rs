//! Door inference and template selection by connectivity pattern.

use crate::mapgen::seed::DungeonRng;
use crate::mapgen::{CellKind, Grid};
use crate::types::{Direction, GridPos, Rect, RoomId};

use super::model::Door;

const DOOR_SPAN: i32 = 3;
const FALLBACK_TEMPLATES: [&str; 3] = ["GENERIC_ROOM_A", "GENERIC_ROOM_B", "GENERIC_ROOM_C"];

/// Carved hallways around `pos` paired with the room each one leads to.
/// Hallways into cells with an unrecognised room code are not connections.
pub(super) fn connections(grid: &Grid, pos: GridPos) -> Vec<(Direction, RoomId)> {
    grid.hallway_directions(pos)
        .into_iter()
        .filter_map(|direction| {
            let target = grid.neighbor(pos, direction, 2)?;
            let known = grid.is_room(target) && CellKind::from_code(grid.value(target)).is_some();
            known.then(|| (direction, RoomId::from_grid(target, grid.size())))
        })
        .collect()
}

/// Opening on the room edge facing `direction`, centered on that edge.
pub(super) fn door_bounds(direction: Direction, width: usize, height: usize) -> Rect {
    let (width, height) = (width as i32, height as i32);
    match direction {
        Direction::North => Rect { x: width / 2 - 1, y: 0, width: DOOR_SPAN, height: 1 },
        Direction::South => {
            Rect { x: width / 2 - 1, y: height - 1, width: DOOR_SPAN, height: 1 }
        }
        Direction::West => Rect { x: 0, y: height / 2 - 1, width: 1, height: DOOR_SPAN },
        Direction::East => Rect { x: width - 1, y: height / 2 - 1, width: 1, height: DOOR_SPAN },
    }
}

pub(super) fn doors(
    connections: &[(Direction, RoomId)],
    width: usize,
    height: usize,
) -> Vec<Door> {
    connections
        .iter()
        .map(|&(direction, target)| Door {
            direction,
            target,
            bounds: door_bounds(direction, width, height),
        })
        .collect()
}

/// Landmark rooms use fixed templates; everything else is picked by which
/// sides have doors.
pub(super) fn template_name(
    kind: CellKind,
    directions: &[Direction],
    rng: &mut DungeonRng,
) -> String {
    match kind {
        CellKind::Start => "START_ROOM".to_string(),
        CellKind::End => "END_ROOM".to_string(),
        CellKind::Pillar(_) => "PILLAR_ROOM".to_string(),
        CellKind::Generic | CellKind::Branch(_) | CellKind::BreakableWall => {
            pattern_template(directions, rng)
        }
    }
}

fn pattern_template(directions: &[Direction], rng: &mut DungeonRng) -> String {
    match *directions {
        [] => rng.choose(&FALLBACK_TEMPLATES).copied().unwrap_or("GENERIC_ROOM_A").to_string(),
        [only] => format!("DEAD_END_{}", only.label()),
        [first, second] if first.opposite() == second => {
            if first.is_vertical() {
                "STRAIGHT_HALLWAY_VERTICAL".to_string()
            } else {
                "STRAIGHT_HALLWAY_HORIZONTAL".to_string()
            }
        }
        [first, second] => {
            let (vertical, horizontal) =
                if first.is_vertical() { (first, second) } else { (second, first) };
            format!("CORNER_{}_{}", vertical.label(), horizontal.label())
        }
        [_, _, _] => {
            let missing = Direction::ALL
                .into_iter()
                .find(|direction| !directions.contains(direction))
                .unwrap_or(Direction::North);
            format!("T_JUNCTION_CLOSED_{}", missing.label())
        }
        _ => "CROSS_HALLWAY".to_string(),
    }
}
