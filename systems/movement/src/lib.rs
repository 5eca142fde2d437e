#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement coordination for the grid-courier token.
//!
//! The controller serializes traversals: it accepts at most one move at a
//! time, hands the traversal to an external [`Animator`], and commits the
//! token's new cell atomically only when the animator reports completion.
//! An interrupted traversal is failed-and-discarded: occupancy and the
//! token's logical position stay at their pre-move values and the
//! controller returns to idle, so a failure never wedges the busy gate.

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;

use grid_courier_core::{GridCoord, TokenId};
use grid_courier_world::{query, GridError, TokenMoved, World};

/// Traversal speed used to derive animation durations, in cells per second.
const TRAVERSAL_CELLS_PER_SECOND: f32 = 5.0;

/// External collaborator that carries the token along a traversal.
///
/// Implementations receive world-space waypoints (the path minus the
/// token's own starting cell) and block until the traversal finishes or is
/// interrupted. The controller never inspects how the traversal is shown.
pub trait Animator {
    /// Traverses the provided waypoints over the requested duration.
    fn traverse(
        &mut self,
        waypoints: &[Vec2],
        duration: Duration,
    ) -> Result<(), TraversalInterruption>;
}

/// Animator that completes every traversal immediately.
///
/// Used by tests and headless hosts that only care about the committed
/// outcome of a move.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn traverse(
        &mut self,
        _waypoints: &[Vec2],
        _duration: Duration,
    ) -> Result<(), TraversalInterruption> {
        Ok(())
    }
}

/// Failure reported by an animator whose traversal did not finish.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("traversal interrupted: {reason}")]
pub struct TraversalInterruption {
    reason: String,
}

impl TraversalInterruption {
    /// Creates an interruption record with the provided reason.
    #[must_use]
    pub fn new<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            reason: reason.into(),
        }
    }

    /// Human-readable description of why the traversal stopped.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Reasons a move request is turned down without any state change.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MoveRejection {
    /// A traversal is already in flight; the request is not queued.
    #[error("a move is already in progress")]
    AlreadyMoving,
    /// The provided path contains no cells.
    #[error("the path is empty")]
    EmptyPath,
    /// The path does not begin at the token's current cell.
    #[error("path starts at {found} but the token stands on {expected}")]
    WrongStart {
        /// Cell the token currently occupies.
        expected: GridCoord,
        /// First cell of the rejected path.
        found: GridCoord,
    },
    /// The path touches a cell that can never be traversed.
    #[error("path waypoint {cell} is out of bounds or an obstacle")]
    BlockedWaypoint {
        /// Offending waypoint.
        cell: GridCoord,
    },
    /// Two consecutive path cells are not orthogonal neighbors.
    #[error("path jumps from {from} to {to}")]
    DisconnectedStep {
        /// Cell preceding the jump.
        from: GridCoord,
        /// Cell following the jump.
        to: GridCoord,
    },
}

/// Errors raised when completing a traversal.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompletionError {
    /// `finish` was called while no traversal was in flight.
    #[error("no traversal is in progress")]
    NotMoving,
    /// The committed destination was rejected by the world.
    #[error(transparent)]
    Commit(#[from] GridError),
}

/// Errors surfaced by a blocking [`MovementController::move_along`] call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    /// The animator reported an interruption; the move was discarded.
    #[error(transparent)]
    Interrupted(#[from] TraversalInterruption),
    /// The traversal finished but the commit failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Result of a move request that ran to a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The traversal finished and the new cell was committed.
    Completed(TokenMoved),
    /// The request was a no-op; nothing changed.
    Rejected(MoveRejection),
}

/// Everything an animator needs to carry out an accepted move.
///
/// The waypoints exclude the token's own starting cell; the duration grows
/// linearly with the number of remaining waypoints.
#[derive(Clone, Debug, PartialEq)]
pub struct TraversalPlan {
    waypoints: Vec<Vec2>,
    duration: Duration,
}

impl TraversalPlan {
    /// World-space waypoints remaining on the traversal.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Wall-clock duration the traversal should take.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ControllerState {
    Idle,
    Moving { destination: GridCoord },
}

/// Serializes token movement and keeps grid occupancy consistent.
///
/// The controller is the only caller of [`World::relocate_token`], and it
/// calls it exactly once per completed traversal, so the token's cell and
/// the grid's occupant back-reference always change together.
#[derive(Debug)]
pub struct MovementController {
    token: TokenId,
    state: ControllerState,
}

impl MovementController {
    /// Creates a controller bound to the world's token.
    #[must_use]
    pub const fn new(token: TokenId) -> Self {
        Self {
            token,
            state: ControllerState::Idle,
        }
    }

    /// Identifier of the token this controller coordinates.
    #[must_use]
    pub const fn token(&self) -> TokenId {
        self.token
    }

    /// Reports whether a traversal is currently in flight.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self.state, ControllerState::Moving { .. })
    }

    /// Destination of the in-flight traversal, if any.
    #[must_use]
    pub const fn destination(&self) -> Option<GridCoord> {
        match self.state {
            ControllerState::Idle => None,
            ControllerState::Moving { destination } => Some(destination),
        }
    }

    /// Accepts a move request and produces the traversal plan.
    ///
    /// Rejection leaves every piece of state untouched. On acceptance the
    /// controller transitions to moving, the path's leading cell (the
    /// token's own position) is dropped, and the remaining cells become
    /// world-space waypoints. The caller drives an [`Animator`] with the
    /// plan and then settles the move with [`finish`](Self::finish) or
    /// [`abort`](Self::abort).
    pub fn begin(&mut self, world: &World, path: &[GridCoord]) -> Result<TraversalPlan, MoveRejection> {
        if self.is_moving() {
            return Err(MoveRejection::AlreadyMoving);
        }
        let Some(&first) = path.first() else {
            return Err(MoveRejection::EmptyPath);
        };

        let token_cell = query::token(world).cell;
        if first != token_cell {
            return Err(MoveRejection::WrongStart {
                expected: token_cell,
                found: first,
            });
        }

        for &cell in path {
            if !query::is_in_bounds(world, cell) || query::is_obstacle(world, cell) {
                return Err(MoveRejection::BlockedWaypoint { cell });
            }
        }
        for step in path.windows(2) {
            if step[0].manhattan_distance(step[1]) != 1 {
                return Err(MoveRejection::DisconnectedStep {
                    from: step[0],
                    to: step[1],
                });
            }
        }

        let destination = path.last().copied().unwrap_or(first);
        let waypoints: Vec<Vec2> = path[1..]
            .iter()
            .map(|cell| query::world_position(world, *cell))
            .collect();
        let duration =
            Duration::from_secs_f32(waypoints.len() as f32 / TRAVERSAL_CELLS_PER_SECOND);

        self.state = ControllerState::Moving { destination };
        Ok(TraversalPlan {
            waypoints,
            duration,
        })
    }

    /// Commits the in-flight traversal and returns to idle.
    ///
    /// Clears the occupant of the departed cell, occupies the destination,
    /// and updates the token's position in one step. The returned record is
    /// the move-completed notification.
    pub fn finish(&mut self, world: &mut World) -> Result<TokenMoved, CompletionError> {
        let ControllerState::Moving { destination } = self.state else {
            return Err(CompletionError::NotMoving);
        };

        self.state = ControllerState::Idle;
        let moved = world.relocate_token(destination)?;
        Ok(moved)
    }

    /// Discards the in-flight traversal after an interruption.
    ///
    /// Failed-and-discarded policy: no partial commit is made, the token
    /// logically remains at its pre-move cell, and the controller returns
    /// to idle so a new move can be requested.
    pub fn abort(&mut self) {
        self.state = ControllerState::Idle;
    }

    /// Runs a complete move: accept, traverse, commit.
    ///
    /// A rejected request is reported as an [`MoveOutcome::Rejected`]
    /// no-op. An interruption aborts the move and surfaces as an error
    /// after state has been restored to a consistent idle.
    pub fn move_along<A>(
        &mut self,
        world: &mut World,
        path: &[GridCoord],
        animator: &mut A,
    ) -> Result<MoveOutcome, MoveError>
    where
        A: Animator,
    {
        let plan = match self.begin(world, path) {
            Ok(plan) => plan,
            Err(rejection) => return Ok(MoveOutcome::Rejected(rejection)),
        };

        match animator.traverse(plan.waypoints(), plan.duration()) {
            Ok(()) => {
                let moved = self.finish(world)?;
                Ok(MoveOutcome::Completed(moved))
            }
            Err(interruption) => {
                self.abort();
                Err(MoveError::Interrupted(interruption))
            }
        }
    }
}
