//! Hop-bounded room visibility for the minimap.
//! Distance counts rooms crossed, not cells, so a long corridor is one hop.
//! Recomputed on room transitions only; nothing here runs per frame.

use std::collections::{BTreeSet, VecDeque};

use crate::mapgen::Grid;
use crate::types::{Direction, GridPos, RoomId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityView {
    pub current: GridPos,
    pub visible: BTreeSet<RoomId>,
    pub visited: BTreeSet<RoomId>,
    /// Hallway cells the minimap should draw.
    pub lit_hallways: BTreeSet<GridPos>,
}

/// Breadth-first search from `current` over every carved cell. A hallway
/// leaving a room at the edge of `vision_range` is still lit when the room
/// it leads to is already visible or visited, so corridors draw through
/// into rooms the player has seen.
pub fn compute_visibility(
    grid: &Grid,
    current: GridPos,
    vision_range: u32,
    visited: &BTreeSet<RoomId>,
) -> VisibilityView {
    let width = grid.size();
    let current_id = RoomId::from_grid(current, width);

    let mut visible = BTreeSet::from([current_id]);
    let mut visited = visited.clone();
    visited.insert(current_id);

    let mut lit_hallways = BTreeSet::new();
    let mut boundary = Vec::new();
    let mut seen = BTreeSet::from([current]);
    let mut queue = VecDeque::from([(current, 0u32)]);

    while let Some((cell, hops)) = queue.pop_front() {
        let in_room = grid.is_room(cell);
        for direction in Direction::ALL {
            let Some(next) = grid.neighbor(cell, direction, 1) else {
                continue;
            };
            if grid.value(next) < 1 || seen.contains(&next) {
                continue;
            }

            let entering_room = grid.is_room(next);
            if in_room && !entering_room && hops >= vision_range {
                boundary.push((next, direction));
                continue;
            }

            let next_hops = if !in_room && entering_room { hops + 1 } else { hops };
            if next_hops > vision_range {
                continue;
            }
            seen.insert(next);
            if entering_room {
                visible.insert(RoomId::from_grid(next, width));
            } else {
                lit_hallways.insert(next);
            }
            queue.push_back((next, next_hops));
        }
    }

    for (hallway, direction) in boundary {
        let leads_to_seen = grid
            .neighbor(hallway, direction, 1)
            .filter(|&room| grid.is_room(room))
            .map(|room| RoomId::from_grid(room, width))
            .is_some_and(|room| visible.contains(&room) || visited.contains(&room));
        if leads_to_seen {
            lit_hallways.insert(hallway);
        }
    }

    VisibilityView { current, visible, visited, lit_hallways }
}

/// Fog-of-war state for one playthrough.
#[derive(Clone, Debug)]
pub struct VisibilityGraph {
    vision_range: u32,
    grid_width: usize,
    view: VisibilityView,
}

impl VisibilityGraph {
    pub fn new(grid: &Grid, start: GridPos, vision_range: u32) -> Self {
        let view = compute_visibility(grid, start, vision_range, &BTreeSet::new());
        Self { vision_range, grid_width: grid.size(), view }
    }

    /// Re-queries from `current`. Visited rooms carry over.
    pub fn update(&mut self, grid: &Grid, current: GridPos) -> &VisibilityView {
        self.view = compute_visibility(grid, current, self.vision_range, &self.view.visited);
        &self.view
    }

    pub fn set_vision_range(&mut self, vision_range: u32) {
        self.vision_range = vision_range;
    }

    pub fn vision_range(&self) -> u32 {
        self.vision_range
    }

    pub fn is_room(&self, grid: &Grid, pos: GridPos) -> bool {
        grid.is_room(pos)
    }

    /// True when `pos` is a carved hallway with a visible room at either end.
    pub fn hallway_leads_to_visible(&self, grid: &Grid, pos: GridPos) -> bool {
        grid.is_hallway(pos)
            && Direction::ALL.into_iter().any(|direction| {
                grid.neighbor(pos, direction, 1).is_some_and(|room| {
                    grid.is_room(room) && self.is_visible(RoomId::from_grid(room, self.grid_width))
                })
            })
    }

    pub fn is_visible(&self, room: RoomId) -> bool {
        self.view.visible.contains(&room)
    }

    pub fn is_visited(&self, room: RoomId) -> bool {
        self.view.visited.contains(&room)
    }

    /// Rooms that are visible and hallways that are lit.
    pub fn is_lit(&self, pos: GridPos) -> bool {
        self.view.lit_hallways.contains(&pos)
            || (pos.is_room() && self.is_visible(RoomId::from_grid(pos, self.grid_width)))
    }

    pub fn visible(&self) -> &BTreeSet<RoomId> {
        &self.view.visible
    }

    pub fn visited(&self) -> &BTreeSet<RoomId> {
        &self.view.visited
    }

    pub fn current_position(&self) -> GridPos {
        self.view.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straight corridor of five rooms along row 0 of a 9x9 grid.
    fn corridor() -> Grid {
        let mut rows = vec![vec![0; 9]; 9];
        rows[0] = vec![9, 1, 2, 1, 2, 1, 2, 1, 10];
        Grid::from_rows(&rows).expect("square rows")
    }

    fn room(col: usize) -> RoomId {
        RoomId::from_grid(GridPos::new(0, col), 9)
    }

    #[test]
    fn range_counts_rooms_not_cells() {
        let grid = corridor();
        let view = compute_visibility(&grid, GridPos::new(0, 0), 2, &BTreeSet::new());
        assert_eq!(view.visible, BTreeSet::from([room(0), room(2), room(4)]));
        assert!(view.lit_hallways.contains(&GridPos::new(0, 3)));
        assert!(!view.lit_hallways.contains(&GridPos::new(0, 5)), "room 6 is out of range");
    }

    #[test]
    fn zero_range_sees_only_the_current_room() {
        let grid = corridor();
        let view = compute_visibility(&grid, GridPos::new(0, 4), 0, &BTreeSet::new());
        assert_eq!(view.visible, BTreeSet::from([room(4)]));
        assert_eq!(view.visited, BTreeSet::from([room(4)]));
        assert!(view.lit_hallways.is_empty());
    }

    #[test]
    fn boundary_hallway_draws_into_visited_room() {
        let grid = corridor();
        let visited = BTreeSet::from([room(8)]);
        let view = compute_visibility(&grid, GridPos::new(0, 4), 1, &visited);

        assert_eq!(view.visible, BTreeSet::from([room(2), room(4), room(6)]));
        assert!(view.lit_hallways.contains(&GridPos::new(0, 7)), "leads to visited room 8");
        assert!(!view.lit_hallways.contains(&GridPos::new(0, 1)), "room 0 never seen");
        assert!(!view.visible.contains(&room(8)));
    }

    #[test]
    fn visited_only_grows_and_holds_current_room() {
        let grid = corridor();
        let mut graph = VisibilityGraph::new(&grid, GridPos::new(0, 0), 1);
        let mut previous = graph.visited().clone();
        for col in [2, 4, 6, 8, 6, 0] {
            graph.update(&grid, GridPos::new(0, col));
            assert!(graph.visited().is_superset(&previous));
            assert!(graph.visited().contains(&room(col)));
            assert!(graph.visible().contains(&room(col)));
            assert_eq!(graph.current_position(), GridPos::new(0, col));
            previous = graph.visited().clone();
        }
        assert_eq!(graph.visited().len(), 5);
    }

    #[test]
    fn query_surface_reports_rooms_and_lit_hallways() {
        let grid = corridor();
        let graph = VisibilityGraph::new(&grid, GridPos::new(0, 0), 1);

        assert!(graph.is_room(&grid, GridPos::new(0, 2)));
        assert!(!graph.is_room(&grid, GridPos::new(0, 1)));
        assert!(graph.hallway_leads_to_visible(&grid, GridPos::new(0, 3)));
        assert!(!graph.hallway_leads_to_visible(&grid, GridPos::new(0, 5)));
        assert!(graph.is_lit(GridPos::new(0, 1)));
        assert!(graph.is_lit(GridPos::new(0, 2)));
        assert!(!graph.is_lit(GridPos::new(0, 4)));
    }

    #[test]
    fn new_vision_range_applies_on_next_update() {
        let grid = corridor();
        let mut graph = VisibilityGraph::new(&grid, GridPos::new(0, 0), 1);
        assert_eq!(graph.visible(), &BTreeSet::from([room(0), room(2)]));

        graph.set_vision_range(3);
        assert_eq!(graph.vision_range(), 3);
        assert_eq!(graph.visible().len(), 2, "range change waits for the next update");

        graph.update(&grid, GridPos::new(0, 0));
        assert_eq!(graph.visible(), &BTreeSet::from([room(0), room(2), room(4), room(6)]));
    }

    #[test]
    fn visited_rooms_stay_visited_after_leaving_sight() {
        let grid = corridor();
        let mut graph = VisibilityGraph::new(&grid, GridPos::new(0, 0), 0);
        graph.update(&grid, GridPos::new(0, 8));

        assert!(graph.is_visited(room(0)));
        assert!(!graph.is_visible(room(0)));
        assert!(graph.is_visited(room(8)));
        assert!(!graph.is_visited(room(4)), "passing through the corridor is not a visit");
    }
}
