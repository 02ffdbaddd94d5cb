//! Random walks that carve rooms and hallways two cells at a time.

use crate::types::GridPos;

use super::cell::{EMPTY, END_ROOM, GENERIC_ROOM, HALLWAY};
use super::grid::Grid;
use super::seed::DungeonRng;

/// A branch stops once it steps onto a room above this value that is not
/// one of its own cells.
const BRANCH_GOAL_THRESHOLD: i32 = HALLWAY;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum WalkOutcome {
    Reached,
    StepLimit,
}

/// Walks from `start` until the pre-stamped end room is reached. Leaving the
/// grid jumps the walker to a random room it has already carved.
pub(super) fn carve_primary_walk(
    grid: &mut Grid,
    start: GridPos,
    rng: &mut DungeonRng,
    max_steps: u32,
) -> WalkOutcome {
    let mut carved_rooms = vec![start];
    let mut current = start;

    for _ in 0..max_steps {
        let direction = rng.direction();
        let Some(next) = grid.neighbor(current, direction, 2) else {
            if let Some(&resume) = rng.choose(&carved_rooms) {
                current = resume;
            }
            continue;
        };
        if let Some(hallway) = grid.neighbor(current, direction, 1) {
            grid.set(hallway, HALLWAY);
        }

        match grid.value(next) {
            END_ROOM => return WalkOutcome::Reached,
            EMPTY => {
                grid.set(next, GENERIC_ROOM);
                carved_rooms.push(next);
            }
            _ => {}
        }
        current = next;
    }

    WalkOutcome::StepLimit
}

/// Walks from a pillar anchor, tagging fresh rooms with `marker`, until it
/// joins rooms carved by someone else. Leaving the grid keeps the walker on
/// its previous cell so the next draw picks another direction.
pub(super) fn carve_branch_walk(
    grid: &mut Grid,
    anchor: GridPos,
    marker: i32,
    rng: &mut DungeonRng,
    max_steps: u32,
) -> WalkOutcome {
    grid.set(anchor, marker);
    let mut current = anchor;

    for _ in 0..max_steps {
        let direction = rng.direction();
        let Some(next) = grid.neighbor(current, direction, 2) else {
            continue;
        };
        if let Some(hallway) = grid.neighbor(current, direction, 1) {
            grid.set(hallway, HALLWAY);
        }

        let value = grid.value(next);
        if value > BRANCH_GOAL_THRESHOLD && value != marker {
            return WalkOutcome::Reached;
        }
        if value == EMPTY {
            grid.set(next, marker);
        }
        current = next;
    }

    WalkOutcome::StepLimit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::cell::{START_ROOM, branch_marker};

    fn stamped_grid() -> Grid {
        let mut grid = Grid::new(8);
        grid.set(GridPos::new(2, 2), START_ROOM);
        grid.set(GridPos::new(6, 6), END_ROOM);
        grid
    }

    #[test]
    fn primary_walk_reaches_end_and_connects_it() {
        for stream in 0..50 {
            let mut grid = stamped_grid();
            let mut rng = DungeonRng::for_stream(404, stream);
            let outcome = carve_primary_walk(&mut grid, GridPos::new(2, 2), &mut rng, 10_000);
            assert_eq!(outcome, WalkOutcome::Reached);
            let reached = grid.reachable_rooms(GridPos::new(2, 2));
            assert!(reached.contains(&GridPos::new(6, 6)), "stream {stream}");
            assert_eq!(grid.value(GridPos::new(2, 2)), START_ROOM);
        }
    }

    #[test]
    fn primary_walk_reports_step_limit() {
        let mut grid = stamped_grid();
        let mut rng = DungeonRng::for_stream(1, 1);
        assert_eq!(
            carve_primary_walk(&mut grid, GridPos::new(2, 2), &mut rng, 1),
            WalkOutcome::StepLimit
        );
    }

    #[test]
    fn branch_walk_joins_existing_maze_without_overwriting_it() {
        for stream in 0..50 {
            let mut grid = stamped_grid();
            let mut rng = DungeonRng::for_stream(77, stream);
            carve_primary_walk(&mut grid, GridPos::new(2, 2), &mut rng, 10_000);
            let before = grid.clone();

            let Some(anchor) =
                grid.positions().find(|&pos| pos.is_room() && grid.value(pos) == EMPTY)
            else {
                continue;
            };
            let marker = branch_marker(0);
            let outcome = carve_branch_walk(&mut grid, anchor, marker, &mut rng, 10_000);
            assert_eq!(outcome, WalkOutcome::Reached);

            for pos in before.room_positions() {
                assert_eq!(grid.value(pos), before.value(pos), "branch overwrote {pos:?}");
            }
            assert!(
                grid.reachable_rooms(GridPos::new(2, 2)).contains(&anchor),
                "branch anchor {anchor:?} must join the maze (stream {stream})"
            );
        }
    }
}
