use crate::error::{SimError, SimResult};
use crate::grid::Grid;
use crate::obstacles::{ObstacleGenerator, DEFAULT_ATTEMPTS_PER_CELL};
use crate::pathfinding::FallbackPolicy;
use crate::step::{advance, EngineState, EngineStatus, Snapshot, StepContext, TickOutcome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Tunables fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Seed for the engine-local RNG; reset reseeds from it
    pub seed: u64,
    pub attempts_per_cell: u32,
    pub fallback: FallbackPolicy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            seed: 0,
            attempts_per_cell: DEFAULT_ATTEMPTS_PER_CELL,
            fallback: FallbackPolicy::default(),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Reached,
    Exhausted,
    /// Stopped by the tick limit or deadline before a terminal state
    Truncated,
    Unsatisfiable { requested: u32, available: usize },
}

impl RunOutcome {
    fn from_status(status: EngineStatus) -> Option<Self> {
        match status {
            EngineStatus::Reached => Some(RunOutcome::Reached),
            EngineStatus::Exhausted => Some(RunOutcome::Exhausted),
            EngineStatus::Unsatisfiable {
                requested,
                available,
            } => Some(RunOutcome::Unsatisfiable {
                requested,
                available,
            }),
            EngineStatus::Running | EngineStatus::Stuck { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Ticks attempted during this run
    pub ticks: u64,
    pub elapsed: Duration,
    pub outcome: RunOutcome,
}

/// A single scenario: grid, agent trail, obstacles and budget, plus the RNG
/// that drives obstacle placement. Instances share nothing.
pub struct Engine {
    grid: Grid,
    state: EngineState,
    initial_budget: u32,
    options: EngineOptions,
    generator: ObstacleGenerator,
    rng: ChaCha8Rng,
}

impl Engine {
    /// Start a scenario with default options
    pub fn configure(grid: Grid, obstacle_budget: u32) -> SimResult<Self> {
        Self::with_options(grid, obstacle_budget, EngineOptions::default())
    }

    pub fn with_options(
        grid: Grid,
        obstacle_budget: u32,
        options: EngineOptions,
    ) -> SimResult<Self> {
        debug!(
            "configured {}x{} grid {} -> {}, budget {}, seed {}",
            grid.rows(),
            grid.cols(),
            grid.start(),
            grid.end(),
            obstacle_budget,
            options.seed
        );
        Ok(Engine {
            state: EngineState::new(&grid, obstacle_budget),
            grid,
            initial_budget: obstacle_budget,
            options,
            generator: ObstacleGenerator::new(options.attempts_per_cell),
            rng: ChaCha8Rng::seed_from_u64(options.seed),
        })
    }

    /// Replace the grid and budget and start over. The RNG is reseeded, so a
    /// reset scenario replays the same obstacle draws.
    pub fn reset(&mut self, grid: Grid, obstacle_budget: u32) -> SimResult<()> {
        self.state = EngineState::new(&grid, obstacle_budget);
        self.grid = grid;
        self.initial_budget = obstacle_budget;
        self.rng = ChaCha8Rng::seed_from_u64(self.options.seed);
        debug!("reset, budget {}", obstacle_budget);
        Ok(())
    }

    /// Reset to the current grid and the last configured budget
    pub fn restart(&mut self) {
        self.state = EngineState::new(&self.grid, self.initial_budget);
        self.rng = ChaCha8Rng::seed_from_u64(self.options.seed);
    }

    /// Run one tick. On `Unsatisfiable` the tick is discarded and the engine
    /// stays halted until reset.
    pub fn tick(&mut self) -> SimResult<TickOutcome> {
        let mut ctx = StepContext {
            grid: &self.grid,
            generator: &self.generator,
            fallback: self.options.fallback,
            rng: &mut self.rng,
        };
        match advance(&self.state, &mut ctx) {
            Ok((next, outcome)) => {
                self.state = next;
                Ok(outcome)
            }
            Err(SimError::Unsatisfiable {
                requested,
                available,
            }) => {
                if !matches!(self.state.status, EngineStatus::Unsatisfiable { .. }) {
                    warn!(
                        "cannot place {} obstacles, only {} free cells; halting",
                        requested, available
                    );
                }
                self.state.status = EngineStatus::Unsatisfiable {
                    requested,
                    available,
                };
                Err(SimError::Unsatisfiable {
                    requested,
                    available,
                })
            }
            Err(e) => Err(e),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn budget(&self) -> u32 {
        self.state.budget
    }

    pub fn status(&self) -> EngineStatus {
        self.state.status
    }

    /// Upper bound on the ticks any run from a fresh state can take: every
    /// tick either adds a trail cell, lowers the budget, or ends the run.
    pub fn tick_bound(&self) -> u64 {
        self.grid.cell_count() as u64 + u64::from(self.initial_budget) + 1
    }

    /// Tick until a terminal state or `max_ticks` attempts
    pub fn run_to_completion(&mut self, max_ticks: u64) -> RunReport {
        self.run_until(max_ticks, None)
    }

    /// Like `run_to_completion`, also stopping once `deadline` has passed
    pub fn run_until(&mut self, max_ticks: u64, deadline: Option<Instant>) -> RunReport {
        self.run_observed(max_ticks, deadline, |_, _| {})
    }

    /// Drive the tick loop, calling `on_tick` after every committed tick.
    pub fn run_observed<F>(
        &mut self,
        max_ticks: u64,
        deadline: Option<Instant>,
        mut on_tick: F,
    ) -> RunReport
    where
        F: FnMut(&EngineState, &TickOutcome),
    {
        let started = Instant::now();
        let mut ticks = 0u64;

        let outcome = loop {
            if let Some(outcome) = RunOutcome::from_status(self.state.status) {
                break outcome;
            }
            if ticks >= max_ticks {
                break RunOutcome::Truncated;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break RunOutcome::Truncated;
            }

            ticks += 1;
            // Unsatisfiable is recorded in the status and ends the loop above.
            if let Ok(outcome) = self.tick() {
                on_tick(&self.state, &outcome);
            }
        };

        let report = RunReport {
            ticks,
            elapsed: started.elapsed(),
            outcome,
        };
        debug!(
            "run finished: {:?} after {} ticks in {:?}",
            report.outcome, report.ticks, report.elapsed
        );
        report
    }

    /// Iterate tick outcomes until the scenario is terminal
    pub fn ticks(&mut self) -> Ticks<'_> {
        Ticks { engine: self }
    }
}

/// Iterator returned by [`Engine::ticks`].
///
/// Yields the outcome of each tick, including the one that ends the run,
/// then stops.
pub struct Ticks<'a> {
    engine: &'a mut Engine,
}

impl Iterator for Ticks<'_> {
    type Item = SimResult<TickOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.engine.status().is_terminal() {
            return None;
        }
        Some(self.engine.tick())
    }
}
