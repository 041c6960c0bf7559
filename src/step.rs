//! One simulation tick as a pure transition over [`EngineState`].
//!
//! A tick plans a path from the agent's cell to the end, then either moves
//! the agent one cell and redraws obstacles with the same budget, or (when no
//! usable path exists) lowers the budget by one and redraws obstacles without
//! moving. A failed tick at budget zero is terminal.

use crate::error::{SimError, SimResult};
use crate::grid::{Grid, Position};
use crate::obstacles::{ObstacleGenerator, ObstacleSet};
use crate::pathfinding::{find_path, FallbackPolicy};
use crate::trail::Trail;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Where a scenario run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EngineStatus {
    Running,
    /// Last tick found no path and lowered the budget to `budget`
    Stuck { budget: u32 },
    Reached,
    /// Budget hit zero with no path. Terminal until reset.
    Exhausted,
    /// Obstacle placement could not be satisfied. Terminal until reset.
    Unsatisfiable { requested: u32, available: usize },
}

impl EngineStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineStatus::Reached | EngineStatus::Exhausted | EngineStatus::Unsatisfiable { .. }
        )
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TickOutcome {
    Advanced(Position),
    Shrunk(u32),
    Reached,
    Exhausted,
}

/// Everything a scenario run owns between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub trail: Trail,
    pub obstacles: ObstacleSet,
    pub budget: u32,
    pub status: EngineStatus,
    /// Ticks that did work (advanced, shrank or exhausted)
    pub ticks: u64,
    /// Ticks that moved the agent
    pub moves: u64,
}

/// Read-only view for rendering and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub trail: Vec<Position>,
    pub obstacles: Vec<Position>,
    pub budget: u32,
    pub status: EngineStatus,
    pub ticks: u64,
    pub moves: u64,
}

impl EngineState {
    /// Fresh scenario: agent on start, no obstacles yet.
    pub fn new(grid: &Grid, budget: u32) -> Self {
        let status = if grid.start() == grid.end() {
            EngineStatus::Reached
        } else {
            EngineStatus::Running
        };
        EngineState {
            trail: Trail::new(grid.start()),
            obstacles: ObstacleSet::empty(),
            budget,
            status,
            ticks: 0,
            moves: 0,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            trail: self.trail.to_vec(),
            obstacles: self.obstacles.to_vec(),
            budget: self.budget,
            status: self.status,
            ticks: self.ticks,
            moves: self.moves,
        }
    }
}

/// Collaborators a tick needs besides the state itself.
pub struct StepContext<'a, R: Rng + ?Sized> {
    pub grid: &'a Grid,
    pub generator: &'a ObstacleGenerator,
    pub fallback: FallbackPolicy,
    pub rng: &'a mut R,
}

/// Compute the state after one tick.
///
/// Terminal states are returned unchanged. An `Unsatisfiable` obstacle draw
/// aborts the whole tick: the error is returned and `state` is left as the
/// caller's last committed state.
pub fn advance<R: Rng + ?Sized>(
    state: &EngineState,
    ctx: &mut StepContext<'_, R>,
) -> SimResult<(EngineState, TickOutcome)> {
    match state.status {
        EngineStatus::Reached => return Ok((state.clone(), TickOutcome::Reached)),
        EngineStatus::Exhausted => return Ok((state.clone(), TickOutcome::Exhausted)),
        EngineStatus::Unsatisfiable {
            requested,
            available,
        } => {
            return Err(SimError::Unsatisfiable {
                requested,
                available,
            })
        }
        EngineStatus::Running | EngineStatus::Stuck { .. } => {}
    }

    let grid = ctx.grid;
    if state.trail.last() == grid.end() {
        let mut next = state.clone();
        next.status = EngineStatus::Reached;
        return Ok((next, TickOutcome::Reached));
    }

    let path = find_path(&state.trail, &state.obstacles, grid, ctx.fallback);
    let mut next = state.clone();
    next.ticks += 1;

    match path {
        Some(path) if path.len() > 1 => {
            let cell = path[1];
            next.trail.push(cell);
            next.moves += 1;

            if cell == grid.end() {
                next.obstacles = ObstacleSet::empty();
                next.status = EngineStatus::Reached;
                info!("tick {}: reached {} after {} moves", next.ticks, cell, next.moves);
            } else {
                next.obstacles = ctx
                    .generator
                    .generate(&next.trail, next.budget, grid, &mut *ctx.rng)?;
                next.status = EngineStatus::Running;
                debug!(
                    "tick {}: advanced to {} ({} cells left on path)",
                    next.ticks,
                    cell,
                    path.len() - 2
                );
            }
            Ok((next, TickOutcome::Advanced(cell)))
        }
        _ => {
            if state.budget == 0 {
                next.obstacles = ObstacleSet::empty();
                next.status = EngineStatus::Exhausted;
                warn!(
                    "tick {}: no path from {} with zero obstacles, exhausted",
                    next.ticks,
                    state.trail.last()
                );
                return Ok((next, TickOutcome::Exhausted));
            }

            let budget = state.budget - 1;
            next.budget = budget;
            next.obstacles = ctx
                .generator
                .generate(&next.trail, budget, grid, &mut *ctx.rng)?;
            next.status = EngineStatus::Stuck { budget };
            debug!(
                "tick {}: no path from {}, budget lowered to {}",
                next.ticks,
                state.trail.last(),
                budget
            );
            Ok((next, TickOutcome::Shrunk(budget)))
        }
    }
}
