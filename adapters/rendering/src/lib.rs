#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for grid-courier adapters.
//!
//! Backends never see the world directly: they consume a [`GridScene`]
//! snapshot composed from the world and, optionally, the most recently
//! computed path, so every renderer highlights the same cells the same way.

use std::collections::HashSet;

use anyhow::Result as AnyResult;

use grid_courier_core::GridCoord;
use grid_courier_world::{query, World};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Membership record for the most recently computed path.
///
/// Renderers ask it per cell whether the cell should be highlighted; it is
/// rebuilt from scratch on every path computation and cleared when a move
/// completes.
#[derive(Clone, Debug, Default)]
pub struct PathOverlay {
    cells: HashSet<GridCoord>,
}

impl PathOverlay {
    /// Records the cells of a freshly computed path.
    #[must_use]
    pub fn from_path(path: &[GridCoord]) -> Self {
        Self {
            cells: path.iter().copied().collect(),
        }
    }

    /// Reports whether the cell lies on the recorded path.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.cells.contains(&coord)
    }

    /// Reports whether any path is recorded at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Fill applied to a single cell when the scene is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellFill {
    /// Plain traversable cell with no highlight active.
    Default,
    /// Impassable cell.
    Obstacle,
    /// Traversable cell on the highlighted path.
    OnPath,
    /// Traversable cell off the highlighted path while a highlight is up.
    OffPath,
}

impl CellFill {
    /// Color assigned to the fill.
    ///
    /// Obstacles draw black, highlighted path cells green, the remaining
    /// cells red while a highlight is active and white otherwise.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Default => Color::from_rgb_u8(0xff, 0xff, 0xff),
            Self::Obstacle => Color::from_rgb_u8(0x00, 0x00, 0x00),
            Self::OnPath => Color::from_rgb_u8(0x00, 0xff, 0x00),
            Self::OffPath => Color::from_rgb_u8(0xff, 0x00, 0x00),
        }
    }
}

/// Presentation state of a single cell within a composed scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPresentation {
    /// Coordinate of the presented cell.
    pub coord: GridCoord,
    /// Fill the renderer should apply.
    pub fill: CellFill,
    /// Whether the token currently stands on the cell.
    pub has_token: bool,
}

/// Immutable scene snapshot consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct GridScene {
    width: u32,
    height: u32,
    cell_length: f32,
    cells: Vec<CellPresentation>,
    token: GridCoord,
}

impl GridScene {
    /// Composes a scene from the world and an optional path highlight.
    #[must_use]
    pub fn compose(world: &World, overlay: Option<&PathOverlay>) -> Self {
        let (width, height) = query::dimensions(world);
        let token = query::token(world);

        let cells = query::cells(world)
            .map(|cell| {
                let fill = if cell.is_obstacle() {
                    CellFill::Obstacle
                } else {
                    match overlay {
                        Some(overlay) if overlay.contains(cell.coord()) => CellFill::OnPath,
                        Some(_) => CellFill::OffPath,
                        None => CellFill::Default,
                    }
                };
                CellPresentation {
                    coord: cell.coord(),
                    fill,
                    has_token: cell.occupant().is_some(),
                }
            })
            .collect();

        Self {
            width,
            height,
            cell_length: query::cell_length(world),
            cells,
            token: token.cell,
        }
    }

    /// Number of cell columns in the scene.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cell rows in the scene.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Side length of a square cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Presented cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellPresentation] {
        &self.cells
    }

    /// Cell the token stands on.
    #[must_use]
    pub const fn token(&self) -> GridCoord {
        self.token
    }
}

/// Rendering backend capable of presenting grid-courier scenes.
pub trait SceneSink {
    /// Presents a single scene snapshot.
    fn present(&mut self, scene: &GridScene) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_courier_core::LevelConfig;

    fn test_world() -> World {
        let config = LevelConfig::new(3, 2, vec![GridCoord::new(1, 0)], GridCoord::new(0, 0));
        World::from_config(&config).expect("valid test level")
    }

    fn fill_at(scene: &GridScene, coord: GridCoord) -> CellFill {
        scene
            .cells()
            .iter()
            .find(|cell| cell.coord == coord)
            .expect("cell is part of the scene")
            .fill
    }

    #[test]
    fn compose_without_overlay_uses_default_fills() {
        let world = test_world();
        let scene = GridScene::compose(&world, None);

        assert_eq!(scene.width(), 3);
        assert_eq!(scene.height(), 2);
        assert_eq!(fill_at(&scene, GridCoord::new(0, 0)), CellFill::Default);
        assert_eq!(fill_at(&scene, GridCoord::new(1, 0)), CellFill::Obstacle);
        assert_eq!(scene.token(), GridCoord::new(0, 0));
    }

    #[test]
    fn compose_with_overlay_splits_on_and_off_path() {
        let world = test_world();
        let path = [
            GridCoord::new(0, 0),
            GridCoord::new(0, 1),
            GridCoord::new(1, 1),
        ];
        let overlay = PathOverlay::from_path(&path);
        let scene = GridScene::compose(&world, Some(&overlay));

        assert_eq!(fill_at(&scene, GridCoord::new(0, 1)), CellFill::OnPath);
        assert_eq!(fill_at(&scene, GridCoord::new(2, 1)), CellFill::OffPath);
        assert_eq!(fill_at(&scene, GridCoord::new(1, 0)), CellFill::Obstacle);
    }

    #[test]
    fn token_marker_follows_occupancy() {
        let world = test_world();
        let scene = GridScene::compose(&world, None);

        let marked: Vec<GridCoord> = scene
            .cells()
            .iter()
            .filter(|cell| cell.has_token)
            .map(|cell| cell.coord)
            .collect();
        assert_eq!(marked, vec![GridCoord::new(0, 0)]);
    }

    #[test]
    fn fills_map_to_the_highlight_palette() {
        assert_eq!(CellFill::Obstacle.color(), Color::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(CellFill::OnPath.color(), Color::from_rgb_u8(0x00, 0xff, 0x00));
        assert_eq!(CellFill::Default.color(), Color::from_rgb_u8(0xff, 0xff, 0xff));
        assert_eq!(CellFill::OffPath.color(), Color::from_rgb_u8(0xff, 0x00, 0x00));
    }

    #[test]
    fn overlay_reports_membership() {
        let overlay = PathOverlay::from_path(&[GridCoord::new(1, 1)]);

        assert!(overlay.contains(GridCoord::new(1, 1)));
        assert!(!overlay.contains(GridCoord::new(0, 1)));
        assert!(!overlay.is_empty());
        assert!(PathOverlay::default().is_empty());
    }
}
