#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* search over the world's obstacle grid.
//!
//! The search is a pure function of the world snapshot: it never mutates
//! grid or token state, and identical inputs always produce the identical
//! cell sequence. Paths are orthogonal, unit-cost, and shortest under the
//! Manhattan metric.

use thiserror::Error;

use grid_courier_core::GridCoord;
use grid_courier_world::{query, World};

/// Errors raised when a path request itself is malformed.
///
/// An unreachable goal is not an error; it yields an empty path so callers
/// can distinguish "no route exists" from "the request made no sense".
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A path endpoint lies outside the grid.
    #[error("path endpoint {coord} lies outside the grid")]
    OutOfBounds {
        /// Endpoint that failed the bounds check.
        coord: GridCoord,
    },
    /// A path endpoint names an obstacle cell.
    #[error("path endpoint {coord} is an obstacle")]
    Obstructed {
        /// Endpoint that names an obstacle.
        coord: GridCoord,
    },
}

/// Stateless shortest-path engine.
///
/// Every search allocates its bookkeeping locally, so one instance can serve
/// any number of worlds and requests.
#[derive(Debug, Default)]
pub struct PathFinder;

impl PathFinder {
    /// Computes the shortest orthogonal path between two cells.
    ///
    /// Returns the full cell sequence from `start` to `goal` inclusive, a
    /// single-element sequence when `start == goal`, or an empty sequence
    /// when the goal cannot be reached. Fails fast when either endpoint is
    /// out of bounds or an obstacle.
    pub fn find_path(
        &self,
        world: &World,
        start: GridCoord,
        goal: GridCoord,
    ) -> Result<Vec<GridCoord>, PathError> {
        validate_endpoint(world, start)?;
        validate_endpoint(world, goal)?;

        if start == goal {
            return Ok(vec![start]);
        }

        let (width, height) = query::dimensions(world);
        let mut search = Search::new(width, height);
        search.run(world, start, goal)
    }
}

fn validate_endpoint(world: &World, coord: GridCoord) -> Result<(), PathError> {
    if !query::is_in_bounds(world, coord) {
        return Err(PathError::OutOfBounds { coord });
    }
    if query::is_obstacle(world, coord) {
        return Err(PathError::Obstructed { coord });
    }
    Ok(())
}

/// Transient per-search record tied to one grid cell.
///
/// Nodes live in an arena indexed by insertion order; `parent` refers back
/// into the same arena, which keeps the reconstruction walk a plain index
/// chase with no aliasing.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: GridCoord,
    g_cost: u32,
    h_cost: u32,
    parent: Option<usize>,
}

impl SearchNode {
    fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

/// Bookkeeping for a single `find_path` call.
///
/// `best_g` is the durable cell -> best-known gCost table consulted before
/// every enqueue; `u32::MAX` marks cells the search has not reached.
/// `open_slot` tracks which arena node currently represents a cell on the
/// open list so cost improvements update that node in place instead of
/// inserting a duplicate, preserving first-insertion order for tie-breaks.
struct Search {
    width: usize,
    arena: Vec<SearchNode>,
    open: Vec<usize>,
    closed: Vec<bool>,
    best_g: Vec<u32>,
    open_slot: Vec<Option<usize>>,
}

impl Search {
    fn new(width: u32, height: u32) -> Self {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        Self {
            width: width_usize,
            arena: Vec::new(),
            open: Vec::new(),
            closed: vec![false; cell_count],
            best_g: vec![u32::MAX; cell_count],
            open_slot: vec![None; cell_count],
        }
    }

    fn run(
        &mut self,
        world: &World,
        start: GridCoord,
        goal: GridCoord,
    ) -> Result<Vec<GridCoord>, PathError> {
        let Some(start_index) = self.cell_index(start) else {
            return Err(PathError::OutOfBounds { coord: start });
        };

        self.arena.push(SearchNode {
            cell: start,
            g_cost: 0,
            h_cost: start.manhattan_distance(goal),
            parent: None,
        });
        self.best_g[start_index] = 0;
        self.open.push(0);
        self.open_slot[start_index] = Some(0);

        while !self.open.is_empty() {
            let node_index = self.select_next();
            let selected = self.arena[node_index];

            if selected.cell == goal {
                return Ok(reconstruct(&self.arena, node_index));
            }

            let Some(cell_index) = self.cell_index(selected.cell) else {
                continue;
            };
            self.closed[cell_index] = true;

            for neighbor in query::neighbors(world, selected.cell) {
                let Some(neighbor_index) = self.cell_index(neighbor) else {
                    continue;
                };
                if self.closed[neighbor_index] || query::is_obstacle(world, neighbor) {
                    continue;
                }

                let tentative_g = selected.g_cost + 1;
                if tentative_g >= self.best_g[neighbor_index] {
                    continue;
                }

                self.best_g[neighbor_index] = tentative_g;
                match self.open_slot[neighbor_index] {
                    Some(existing) => {
                        self.arena[existing].g_cost = tentative_g;
                        self.arena[existing].parent = Some(node_index);
                    }
                    None => {
                        self.arena.push(SearchNode {
                            cell: neighbor,
                            g_cost: tentative_g,
                            h_cost: neighbor.manhattan_distance(goal),
                            parent: Some(node_index),
                        });
                        let arena_index = self.arena.len() - 1;
                        self.open.push(arena_index);
                        self.open_slot[neighbor_index] = Some(arena_index);
                    }
                }
            }
        }

        Ok(Vec::new())
    }

    /// Removes and returns the open node with minimum fCost.
    ///
    /// Ties fall to the lower hCost, then to the earliest-inserted node;
    /// the linear scan only replaces its pick on a strict improvement, and
    /// the order-preserving removal keeps later insertions behind earlier
    /// ones.
    fn select_next(&mut self) -> usize {
        let mut selected_pos = 0;
        for pos in 1..self.open.len() {
            let candidate = &self.arena[self.open[pos]];
            let best = &self.arena[self.open[selected_pos]];
            if candidate.f_cost() < best.f_cost()
                || (candidate.f_cost() == best.f_cost() && candidate.h_cost < best.h_cost)
            {
                selected_pos = pos;
            }
        }

        let node_index = self.open.remove(selected_pos);
        if let Some(cell_index) = self.cell_index(self.arena[node_index].cell) {
            self.open_slot[cell_index] = None;
        }
        node_index
    }

    fn cell_index(&self, cell: GridCoord) -> Option<usize> {
        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        y.checked_mul(self.width)?.checked_add(x)
    }
}

fn reconstruct(arena: &[SearchNode], goal_index: usize) -> Vec<GridCoord> {
    let mut path = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        path.push(arena[index].cell);
        cursor = arena[index].parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_courier_core::LevelConfig;

    fn empty_world(width: u32, height: u32) -> World {
        let config = LevelConfig::new(width, height, Vec::new(), GridCoord::new(0, 0));
        World::from_config(&config).expect("valid config")
    }

    #[test]
    fn find_path_rejects_out_of_bounds_endpoints() {
        let world = empty_world(3, 3);
        let finder = PathFinder::default();

        assert_eq!(
            finder.find_path(&world, GridCoord::new(3, 0), GridCoord::new(0, 0)),
            Err(PathError::OutOfBounds {
                coord: GridCoord::new(3, 0),
            })
        );
        assert_eq!(
            finder.find_path(&world, GridCoord::new(0, 0), GridCoord::new(0, 9)),
            Err(PathError::OutOfBounds {
                coord: GridCoord::new(0, 9),
            })
        );
    }

    #[test]
    fn find_path_rejects_obstacle_endpoints() {
        let config = LevelConfig::new(3, 3, vec![GridCoord::new(2, 2)], GridCoord::new(0, 0));
        let world = World::from_config(&config).expect("valid config");
        let finder = PathFinder::default();

        assert_eq!(
            finder.find_path(&world, GridCoord::new(0, 0), GridCoord::new(2, 2)),
            Err(PathError::Obstructed {
                coord: GridCoord::new(2, 2),
            })
        );
    }

    #[test]
    fn find_path_to_self_returns_single_cell() {
        let world = empty_world(3, 1);
        let finder = PathFinder::default();

        assert_eq!(
            finder.find_path(&world, GridCoord::new(0, 0), GridCoord::new(0, 0)),
            Ok(vec![GridCoord::new(0, 0)])
        );
    }

    #[test]
    fn tie_breaks_prefer_lower_h_cost_then_first_insertion() {
        // On an empty 2x2 grid both neighbors of the start carry equal
        // fCost; the right-hand neighbor was inserted first and its
        // successor reaches the goal with hCost 0, fixing the route.
        let world = empty_world(2, 2);
        let finder = PathFinder::default();

        assert_eq!(
            finder.find_path(&world, GridCoord::new(0, 0), GridCoord::new(1, 1)),
            Ok(vec![
                GridCoord::new(0, 0),
                GridCoord::new(1, 0),
                GridCoord::new(1, 1),
            ])
        );
    }

    #[test]
    fn detour_around_a_wall_gap() {
        // 3x3 grid with a wall on column 1 except the top cell.
        let config = LevelConfig::new(
            3,
            3,
            vec![GridCoord::new(1, 0), GridCoord::new(1, 1)],
            GridCoord::new(0, 0),
        );
        let world = World::from_config(&config).expect("valid config");
        let finder = PathFinder::default();

        let path = finder
            .find_path(&world, GridCoord::new(0, 0), GridCoord::new(2, 0))
            .expect("endpoints are valid");

        assert_eq!(
            path,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 1),
                GridCoord::new(0, 2),
                GridCoord::new(1, 2),
                GridCoord::new(2, 2),
                GridCoord::new(2, 1),
                GridCoord::new(2, 0),
            ]
        );
    }
}
