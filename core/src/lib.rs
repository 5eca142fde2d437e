#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core vocabulary shared across the grid-courier engine.
//!
//! This crate defines the coordinate and identity types that connect the
//! authoritative world, the pathfinding and movement systems, and the
//! adapters, together with the level configuration consumed when a world is
//! created. It carries no behavior beyond coordinate arithmetic so that every
//! other crate can depend on it without pulling in engine state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as x and y indices.
///
/// Coordinates are zero-based; `(0, 0)` is the bottom-left cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two coordinates.
    ///
    /// This is the number of orthogonal steps separating the cells on an
    /// unobstructed grid, which makes it an admissible and consistent
    /// heuristic for 4-directional unit-cost search.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unique identifier assigned to a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(u32);

impl TokenId {
    /// Creates a new token identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Side length of a grid cell used when a level omits the field.
pub const DEFAULT_CELL_LENGTH: f32 = 100.0;

/// Static description of a level consumed when creating a world.
///
/// Obstacle entries that fall outside the grid are ignored during
/// construction; only the spawn cell is validated fatally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Number of cell columns laid out in the grid.
    pub width: u32,
    /// Number of cell rows laid out in the grid.
    pub height: u32,
    /// Cells marked impassable at construction.
    pub obstacles: Vec<GridCoord>,
    /// Cell the token occupies when the level starts.
    pub spawn: GridCoord,
    /// Side length of a square cell measured in world units.
    #[serde(default = "default_cell_length")]
    pub cell_length: f32,
}

fn default_cell_length() -> f32 {
    DEFAULT_CELL_LENGTH
}

impl LevelConfig {
    /// Creates a configuration with the default cell edge length.
    #[must_use]
    pub fn new(width: u32, height: u32, obstacles: Vec<GridCoord>, spawn: GridCoord) -> Self {
        Self {
            width,
            height,
            obstacles,
            spawn,
            cell_length: DEFAULT_CELL_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GridCoord, LevelConfig, TokenId, DEFAULT_CELL_LENGTH};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridCoord::new(1, 1);
        let destination = GridCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn manhattan_distance_to_self_is_zero() {
        let cell = GridCoord::new(7, 2);
        assert_eq!(cell.manhattan_distance(cell), 0);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(3, 9));
    }

    #[test]
    fn token_id_round_trips_through_bincode() {
        assert_round_trip(&TokenId::new(42));
    }

    #[test]
    fn level_config_round_trips_through_bincode() {
        let config = LevelConfig::new(
            5,
            4,
            vec![GridCoord::new(1, 1), GridCoord::new(2, 3)],
            GridCoord::new(0, 0),
        );
        assert_round_trip(&config);
    }

    #[test]
    fn level_config_defaults_cell_length_when_absent() {
        let json = r#"{
            "width": 3,
            "height": 3,
            "obstacles": [],
            "spawn": { "x": 1, "y": 1 }
        }"#;
        let config: LevelConfig = serde_json::from_str(json).expect("config parses");
        assert_eq!(config.cell_length, DEFAULT_CELL_LENGTH);
        assert_eq!(config.spawn, GridCoord::new(1, 1));
    }
}
