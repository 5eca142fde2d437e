#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid and token state for grid-courier.
//!
//! The world owns the fixed-size cell grid, the obstacle layout, and the
//! single movable token. Reads go through the [`query`] module; the only
//! mutation permitted after construction is [`World::relocate_token`], which
//! the movement system calls exactly once per completed traversal so that
//! cell occupancy and the token's position always change together.

use glam::Vec2;
use thiserror::Error;

use grid_courier_core::{GridCoord, LevelConfig, TokenId};

const FIRST_TOKEN_ID: TokenId = TokenId::new(0);

/// One fixed grid position with its obstacle flag and occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: GridCoord,
    obstacle: bool,
    occupant: Option<TokenId>,
}

impl Cell {
    /// Coordinate identifying the cell within its grid.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Reports whether the cell is impassable.
    #[must_use]
    pub const fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    /// Token currently occupying the cell, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<TokenId> {
        self.occupant
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Token {
    id: TokenId,
    cell: GridCoord,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct GridLayout {
    width: u32,
    height: u32,
    cell_length: f32,
}

impl GridLayout {
    /// World-space center of the provided cell.
    ///
    /// The grid is centered on the origin: the bottom-left cell center sits
    /// at `-total_size / 2 + cell_length / 2` along each axis.
    fn world_position(&self, coord: GridCoord) -> Vec2 {
        let total = Vec2::new(
            self.width as f32 * self.cell_length,
            self.height as f32 * self.cell_length,
        );
        let bottom_left = -total / 2.0 + Vec2::splat(self.cell_length / 2.0);
        bottom_left + Vec2::new(coord.x() as f32, coord.y() as f32) * self.cell_length
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        if coord.x() < self.width && coord.y() < self.height {
            let x = usize::try_from(coord.x()).ok()?;
            let y = usize::try_from(coord.y()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(y * width + x)
        } else {
            None
        }
    }
}

/// Fatal errors raised while building a world from a level configuration.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured spawn cell lies outside the grid.
    #[error("spawn cell {spawn} lies outside the {width}x{height} grid")]
    SpawnOutOfBounds {
        /// Spawn coordinate provided by the configuration.
        spawn: GridCoord,
        /// Number of columns in the configured grid.
        width: u32,
        /// Number of rows in the configured grid.
        height: u32,
    },
    /// The configured spawn cell is marked as an obstacle.
    #[error("spawn cell {spawn} is marked as an obstacle")]
    SpawnOnObstacle {
        /// Spawn coordinate provided by the configuration.
        spawn: GridCoord,
    },
}

/// Errors raised by coordinate-addressed world access.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate does not name a cell of this grid.
    #[error("cell {coord} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Coordinate that failed the bounds check.
        coord: GridCoord,
        /// Number of columns in the grid.
        width: u32,
        /// Number of rows in the grid.
        height: u32,
    },
    /// The coordinate names an obstacle cell that can never be occupied.
    #[error("cell {coord} is an obstacle and cannot be occupied")]
    Obstructed {
        /// Coordinate of the obstacle cell.
        coord: GridCoord,
    },
}

/// Record of a committed token relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenMoved {
    /// Identifier of the token that moved.
    pub token: TokenId,
    /// Cell the token occupied before the move.
    pub from: GridCoord,
    /// Cell the token occupies after the move.
    pub to: GridCoord,
}

/// Authoritative grid state: cells, obstacle layout, and the token.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    layout: GridLayout,
    cells: Vec<Cell>,
    token: Token,
}

impl World {
    /// Builds a world from the provided level configuration.
    ///
    /// Allocates `width x height` cells centered on the world origin, marks
    /// the configured obstacles (entries outside the grid are ignored), and
    /// places the token on its spawn cell. Fails when the spawn cell is out
    /// of bounds or impassable.
    pub fn from_config(config: &LevelConfig) -> Result<Self, ConfigError> {
        let layout = GridLayout {
            width: config.width,
            height: config.height,
            cell_length: config.cell_length,
        };

        let Some(spawn_index) = layout.index(config.spawn) else {
            return Err(ConfigError::SpawnOutOfBounds {
                spawn: config.spawn,
                width: config.width,
                height: config.height,
            });
        };

        let capacity_u64 = u64::from(config.width) * u64::from(config.height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for y in 0..config.height {
            for x in 0..config.width {
                cells.push(Cell {
                    coord: GridCoord::new(x, y),
                    obstacle: false,
                    occupant: None,
                });
            }
        }

        for obstacle in &config.obstacles {
            if let Some(index) = layout.index(*obstacle) {
                cells[index].obstacle = true;
            }
        }

        if cells[spawn_index].obstacle {
            return Err(ConfigError::SpawnOnObstacle {
                spawn: config.spawn,
            });
        }

        cells[spawn_index].occupant = Some(FIRST_TOKEN_ID);
        Ok(Self {
            layout,
            cells,
            token: Token {
                id: FIRST_TOKEN_ID,
                cell: config.spawn,
            },
        })
    }

    /// Commits a token relocation, the only mutation the world permits.
    ///
    /// Clears the occupant of the token's current cell, occupies the
    /// destination, and updates the token's position in one step so the
    /// occupancy back-reference never disagrees with the token outside an
    /// in-flight traversal. The destination must be an in-bounds,
    /// non-obstacle cell.
    pub fn relocate_token(&mut self, to: GridCoord) -> Result<TokenMoved, GridError> {
        let Some(to_index) = self.layout.index(to) else {
            return Err(GridError::OutOfBounds {
                coord: to,
                width: self.layout.width,
                height: self.layout.height,
            });
        };
        if self.cells[to_index].obstacle {
            return Err(GridError::Obstructed { coord: to });
        }

        let from = self.token.cell;
        if let Some(from_index) = self.layout.index(from) {
            self.cells[from_index].occupant = None;
        }
        self.cells[to_index].occupant = Some(self.token.id);
        self.token.cell = to;

        Ok(TokenMoved {
            token: self.token.id,
            from,
            to,
        })
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;

    use grid_courier_core::{GridCoord, TokenId};

    use super::{Cell, GridError, World};

    /// Immutable representation of the token's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TokenSnapshot {
        /// Unique identifier assigned to the token.
        pub id: TokenId,
        /// Grid cell currently occupied by the token.
        pub cell: GridCoord,
    }

    /// Width and height of the grid measured in cells.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.layout.width, world.layout.height)
    }

    /// Side length of a single square cell in world units.
    #[must_use]
    pub fn cell_length(world: &World) -> f32 {
        world.layout.cell_length
    }

    /// Reports whether the coordinate names a cell of this grid.
    #[must_use]
    pub fn is_in_bounds(world: &World, coord: GridCoord) -> bool {
        world.layout.index(coord).is_some()
    }

    /// Retrieves the cell at the provided coordinate, failing fast when the
    /// coordinate lies outside the grid.
    pub fn cell_at(world: &World, coord: GridCoord) -> Result<&Cell, GridError> {
        world
            .layout
            .index(coord)
            .map(|index| &world.cells[index])
            .ok_or(GridError::OutOfBounds {
                coord,
                width: world.layout.width,
                height: world.layout.height,
            })
    }

    /// Reports whether the coordinate is impassable.
    ///
    /// Coordinates outside the grid are treated as impassable.
    #[must_use]
    pub fn is_obstacle(world: &World, coord: GridCoord) -> bool {
        world
            .layout
            .index(coord)
            .map_or(true, |index| world.cells[index].obstacle)
    }

    /// Token occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(world: &World, coord: GridCoord) -> Option<TokenId> {
        world
            .layout
            .index(coord)
            .and_then(|index| world.cells[index].occupant)
    }

    /// Captures a read-only snapshot of the token.
    #[must_use]
    pub fn token(world: &World) -> TokenSnapshot {
        TokenSnapshot {
            id: world.token.id,
            cell: world.token.cell,
        }
    }

    /// World-space center of the provided cell.
    #[must_use]
    pub fn world_position(world: &World, coord: GridCoord) -> Vec2 {
        world.layout.world_position(coord)
    }

    /// Iterates every cell of the grid in row-major order.
    pub fn cells(world: &World) -> impl Iterator<Item = &Cell> {
        world.cells.iter()
    }

    /// Up-to-4 in-bounds orthogonal neighbors of the provided cell.
    ///
    /// Neighbors are yielded in right, left, up, down order. Search
    /// tie-breaking depends on this order; it must not change.
    #[must_use]
    pub fn neighbors(world: &World, coord: GridCoord) -> NeighborIter {
        let mut neighbors = NeighborIter::default();

        if coord.x() + 1 < world.layout.width {
            neighbors.push(GridCoord::new(coord.x() + 1, coord.y()));
        }
        if coord.x() > 0 {
            neighbors.push(GridCoord::new(coord.x() - 1, coord.y()));
        }
        if coord.y() + 1 < world.layout.height {
            neighbors.push(GridCoord::new(coord.x(), coord.y() + 1));
        }
        if coord.y() > 0 {
            neighbors.push(GridCoord::new(coord.x(), coord.y() - 1));
        }

        neighbors
    }

    /// Iterator over the orthogonal neighbors of a single cell.
    #[derive(Clone, Debug, Default)]
    pub struct NeighborIter {
        buffer: [Option<GridCoord>; 4],
        len: usize,
        cursor: usize,
    }

    impl NeighborIter {
        fn push(&mut self, cell: GridCoord) {
            if self.len < self.buffer.len() {
                self.buffer[self.len] = Some(cell);
                self.len += 1;
            }
        }
    }

    impl Iterator for NeighborIter {
        type Item = GridCoord;

        fn next(&mut self) -> Option<Self::Item> {
            if self.cursor >= self.len {
                return None;
            }

            let value = self.buffer[self.cursor];
            self.cursor += 1;
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_courier_core::LevelConfig;

    fn config_3x3() -> LevelConfig {
        LevelConfig::new(3, 3, vec![GridCoord::new(1, 1)], GridCoord::new(0, 0))
    }

    #[test]
    fn from_config_places_token_on_spawn() {
        let world = World::from_config(&config_3x3()).expect("valid config");

        let token = query::token(&world);
        assert_eq!(token.cell, GridCoord::new(0, 0));
        assert_eq!(query::occupant(&world, GridCoord::new(0, 0)), Some(token.id));
    }

    #[test]
    fn from_config_marks_obstacles() {
        let world = World::from_config(&config_3x3()).expect("valid config");

        assert!(query::is_obstacle(&world, GridCoord::new(1, 1)));
        assert!(!query::is_obstacle(&world, GridCoord::new(0, 1)));
    }

    #[test]
    fn from_config_ignores_out_of_range_obstacles() {
        let config = LevelConfig::new(
            2,
            2,
            vec![GridCoord::new(9, 9)],
            GridCoord::new(0, 0),
        );
        let world = World::from_config(&config).expect("valid config");

        assert_eq!(query::cells(&world).filter(|cell| cell.is_obstacle()).count(), 0);
    }

    #[test]
    fn from_config_rejects_out_of_bounds_spawn() {
        let config = LevelConfig::new(3, 3, Vec::new(), GridCoord::new(3, 0));

        assert_eq!(
            World::from_config(&config),
            Err(ConfigError::SpawnOutOfBounds {
                spawn: GridCoord::new(3, 0),
                width: 3,
                height: 3,
            })
        );
    }

    #[test]
    fn from_config_rejects_obstacle_spawn() {
        let config = LevelConfig::new(3, 3, vec![GridCoord::new(1, 1)], GridCoord::new(1, 1));

        assert_eq!(
            World::from_config(&config),
            Err(ConfigError::SpawnOnObstacle {
                spawn: GridCoord::new(1, 1),
            })
        );
    }

    #[test]
    fn from_config_rejects_empty_grid() {
        let config = LevelConfig::new(0, 0, Vec::new(), GridCoord::new(0, 0));

        assert!(matches!(
            World::from_config(&config),
            Err(ConfigError::SpawnOutOfBounds { .. })
        ));
    }

    #[test]
    fn cell_at_fails_outside_grid() {
        let world = World::from_config(&config_3x3()).expect("valid config");

        assert!(query::cell_at(&world, GridCoord::new(1, 0)).is_ok());
        assert_eq!(
            query::cell_at(&world, GridCoord::new(0, 3)),
            Err(GridError::OutOfBounds {
                coord: GridCoord::new(0, 3),
                width: 3,
                height: 3,
            })
        );
    }

    #[test]
    fn neighbors_follow_right_left_up_down_order() {
        let world = World::from_config(&config_3x3()).expect("valid config");

        let center: Vec<GridCoord> = query::neighbors(&world, GridCoord::new(1, 1)).collect();
        assert_eq!(
            center,
            vec![
                GridCoord::new(2, 1),
                GridCoord::new(0, 1),
                GridCoord::new(1, 2),
                GridCoord::new(1, 0),
            ]
        );

        let corner: Vec<GridCoord> = query::neighbors(&world, GridCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![GridCoord::new(1, 0), GridCoord::new(0, 1)]);
    }

    #[test]
    fn world_positions_center_the_grid_on_the_origin() {
        let mut config = config_3x3();
        config.obstacles.clear();
        let world = World::from_config(&config).expect("valid config");

        let center = query::world_position(&world, GridCoord::new(1, 1));
        assert_eq!(center, glam::Vec2::ZERO);

        let bottom_left = query::world_position(&world, GridCoord::new(0, 0));
        assert_eq!(bottom_left, glam::Vec2::new(-100.0, -100.0));
    }

    #[test]
    fn relocate_token_moves_occupancy_and_token_together() {
        let mut world = World::from_config(&config_3x3()).expect("valid config");

        let moved = world
            .relocate_token(GridCoord::new(2, 0))
            .expect("destination is free");

        assert_eq!(moved.from, GridCoord::new(0, 0));
        assert_eq!(moved.to, GridCoord::new(2, 0));
        assert_eq!(query::occupant(&world, GridCoord::new(0, 0)), None);
        assert_eq!(
            query::occupant(&world, GridCoord::new(2, 0)),
            Some(moved.token)
        );
        assert_eq!(query::token(&world).cell, GridCoord::new(2, 0));
    }

    #[test]
    fn relocate_token_rejects_obstacle_destination() {
        let mut world = World::from_config(&config_3x3()).expect("valid config");

        assert_eq!(
            world.relocate_token(GridCoord::new(1, 1)),
            Err(GridError::Obstructed {
                coord: GridCoord::new(1, 1),
            })
        );
        assert_eq!(query::token(&world).cell, GridCoord::new(0, 0));
    }
}
