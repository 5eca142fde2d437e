#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that routes the token across an obstacle grid.
//!
//! The binary stands in for a pointer-driven host: each `--target` plays the
//! role of a click, invalid or unreachable selections are no-ops, and every
//! accepted move is rendered before and after traversal.

mod ascii;
mod level_code;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use grid_courier_core::{GridCoord, LevelConfig};
use grid_courier_rendering::{GridScene, PathOverlay, SceneSink};
use grid_courier_system_movement::{InstantAnimator, MoveOutcome, MovementController};
use grid_courier_system_pathfinding::PathFinder;
use grid_courier_world::{query, World};

use crate::ascii::AsciiSink;

/// Route a token between cells of an obstacle grid.
#[derive(Debug, Parser)]
#[command(name = "grid-courier")]
struct Args {
    /// Load the level from a JSON file.
    #[arg(long, value_name = "FILE", conflicts_with_all = ["code", "seed"])]
    level: Option<PathBuf>,

    /// Load the level from a share code.
    #[arg(long, value_name = "CODE", conflicts_with = "seed")]
    code: Option<String>,

    /// Generate a random level from the provided seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Columns of a generated level.
    #[arg(long, default_value_t = 8)]
    width: u32,

    /// Rows of a generated level.
    #[arg(long, default_value_t = 6)]
    height: u32,

    /// Obstacles placed in a generated level.
    #[arg(long, default_value_t = 10)]
    obstacle_count: usize,

    /// Cells to route to in order, written as X,Y.
    #[arg(long = "target", value_name = "X,Y", value_parser = parse_target)]
    targets: Vec<GridCoord>,

    /// Print the level's share code instead of running.
    #[arg(long)]
    emit_code: bool,
}

fn parse_target(value: &str) -> Result<GridCoord, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x = x
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid column in '{value}'"))?;
    let y = y
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid row in '{value}'"))?;
    Ok(GridCoord::new(x, y))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = resolve_level(&args)?;

    if args.emit_code {
        println!("{}", level_code::encode(&config));
        return Ok(());
    }

    let mut world = World::from_config(&config).context("level configuration rejected")?;
    let finder = PathFinder::default();
    let mut controller = MovementController::new(query::token(&world).id);
    let mut animator = InstantAnimator;
    let mut sink = AsciiSink::stdout();

    println!(
        "token {} starts at {}",
        controller.token().get(),
        query::token(&world).cell
    );
    sink.present(&GridScene::compose(&world, None))?;

    for target in &args.targets {
        let start = query::token(&world).cell;
        let path = match finder.find_path(&world, start, *target) {
            Ok(path) => path,
            Err(error) => {
                println!("selection {target} ignored: {error}");
                continue;
            }
        };
        if path.is_empty() {
            println!("selection {target} is unreachable");
            continue;
        }

        let overlay = PathOverlay::from_path(&path);
        sink.present(&GridScene::compose(&world, Some(&overlay)))?;

        match controller.move_along(&mut world, &path, &mut animator) {
            Ok(MoveOutcome::Completed(moved)) => {
                println!("token arrived at {} after {} steps", moved.to, path.len() - 1);
            }
            Ok(MoveOutcome::Rejected(rejection)) => {
                println!("selection {target} ignored: {rejection}");
            }
            Err(error) => {
                println!("traversal toward {target} failed: {error}");
            }
        }
        sink.present(&GridScene::compose(&world, None))?;
    }

    println!("token rests at {}", query::token(&world).cell);
    Ok(())
}

fn resolve_level(args: &Args) -> Result<LevelConfig> {
    if let Some(path) = &args.level {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read level file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("could not parse level file {}", path.display()))?;
        return Ok(config);
    }

    if let Some(code) = &args.code {
        return level_code::decode(code).context("could not decode the level share code");
    }

    if let Some(seed) = args.seed {
        return Ok(random_level(
            args.width,
            args.height,
            args.obstacle_count,
            seed,
        ));
    }

    Ok(default_level())
}

/// Built-in level used when no source is specified.
fn default_level() -> LevelConfig {
    LevelConfig::new(
        8,
        6,
        vec![
            GridCoord::new(2, 0),
            GridCoord::new(2, 1),
            GridCoord::new(2, 2),
            GridCoord::new(5, 5),
            GridCoord::new(5, 4),
            GridCoord::new(5, 3),
            GridCoord::new(6, 2),
        ],
        GridCoord::new(0, 0),
    )
}

/// Deterministic random level: identical seeds yield identical layouts.
fn random_level(width: u32, height: u32, obstacle_count: usize, seed: u64) -> LevelConfig {
    let width = width.max(1);
    let height = height.max(1);

    let mut cells: Vec<GridCoord> = (0..height)
        .flat_map(|y| (0..width).map(move |x| GridCoord::new(x, y)))
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    cells.shuffle(&mut rng);

    let spawn = cells[0];
    let obstacles = cells[1..]
        .iter()
        .take(obstacle_count.min(cells.len() - 1))
        .copied()
        .collect();

    LevelConfig::new(width, height, obstacles, spawn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_accepts_coordinate_pairs() {
        assert_eq!(parse_target("3,4"), Ok(GridCoord::new(3, 4)));
        assert_eq!(parse_target(" 0 , 7 "), Ok(GridCoord::new(0, 7)));
        assert!(parse_target("3").is_err());
        assert!(parse_target("a,b").is_err());
    }

    #[test]
    fn default_level_builds_a_world() {
        let world = World::from_config(&default_level()).expect("built-in level is valid");
        assert_eq!(query::dimensions(&world), (8, 6));
    }

    #[test]
    fn random_levels_are_reproducible_per_seed() {
        let first = random_level(6, 5, 8, 0xfeed);
        let second = random_level(6, 5, 8, 0xfeed);
        let other = random_level(6, 5, 8, 0xbeef);

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(first.obstacles.len(), 8);
        assert!(!first.obstacles.contains(&first.spawn));
        assert!(World::from_config(&first).is_ok());
    }
}
