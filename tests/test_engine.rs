mod common;

use common::{
    assert_obstacles_valid, assert_trail_valid, grid, obstacles_of, pos, positions,
    reference_grid, seeded, trail_of,
};
use shiftgrid::step::{advance, StepContext};
use shiftgrid::{
    Engine, EngineOptions, EngineState, EngineStatus, FallbackPolicy, ObstacleGenerator,
    RunOutcome, SimError, TickOutcome,
};
use std::time::Instant;

fn options(seed: u64) -> EngineOptions {
    EngineOptions {
        seed,
        ..EngineOptions::default()
    }
}

#[test]
fn test_first_tick_on_open_grid_moves_right() {
    let mut engine = Engine::configure(reference_grid(), 0).unwrap();

    assert_eq!(engine.tick().unwrap(), TickOutcome::Advanced(pos(0, 1)));
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.trail, positions(&[(0, 0), (0, 1)]));
    assert!(snapshot.obstacles.is_empty());
    assert_eq!(snapshot.status, EngineStatus::Running);
    assert_eq!(snapshot.moves, 1);
}

#[test]
fn test_zero_budget_reaches_end_along_shortest_path() {
    let grid = reference_grid();
    let mut engine = Engine::configure(grid.clone(), 0).unwrap();

    let report = engine.run_to_completion(100);
    assert_eq!(report.outcome, RunOutcome::Reached);
    assert_eq!(report.ticks, 8);

    let snapshot = engine.snapshot();
    assert_eq!(
        snapshot.trail,
        positions(&[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (1, 4), (2, 4), (3, 4), (4, 4)])
    );
    assert_eq!(snapshot.status, EngineStatus::Reached);
    assert_trail_valid(&grid, &snapshot);

    // Reached is sticky and does no work
    assert_eq!(engine.tick().unwrap(), TickOutcome::Reached);
    assert_eq!(engine.snapshot().ticks, 8);
}

#[test]
fn test_start_equals_end_is_reached_immediately() {
    let mut engine = Engine::configure(grid(3, 3, (1, 1), (1, 1)), 2).unwrap();

    assert_eq!(engine.status(), EngineStatus::Reached);
    assert_eq!(engine.tick().unwrap(), TickOutcome::Reached);
    let report = engine.run_to_completion(10);
    assert_eq!(report.outcome, RunOutcome::Reached);
    assert_eq!(report.ticks, 0);
    assert_eq!(engine.snapshot().trail, positions(&[(1, 1)]));
}

#[test]
fn test_reset_switches_grid_and_budget() {
    let mut engine = Engine::configure(reference_grid(), 3).unwrap();
    engine.tick().unwrap();

    let corridor = grid(1, 4, (0, 0), (0, 3));
    engine.reset(corridor.clone(), 0).unwrap();
    assert_eq!(engine.grid(), &corridor);
    assert_eq!(engine.budget(), 0);
    assert_eq!(engine.snapshot().trail, positions(&[(0, 0)]));
    assert_eq!(engine.tick_bound(), 5);

    let report = engine.run_to_completion(engine.tick_bound());
    assert_eq!(report.outcome, RunOutcome::Reached);
    assert_eq!(report.ticks, 3);
}

#[test]
fn test_tick_bound_counts_cells_and_budget() {
    let engine = Engine::configure(reference_grid(), 3).unwrap();
    assert_eq!(engine.tick_bound(), 25 + 3 + 1);
}

#[test]
fn test_engine_shrinks_budget_to_zero_then_recovers() {
    // Every free cell lies on the corridor, so any obstacle cuts it
    let corridor = grid(1, 7, (0, 0), (0, 6));
    let mut engine = Engine::with_options(corridor.clone(), 4, options(11)).unwrap();
    let mut seen = Vec::new();

    let report = engine.run_observed(engine.tick_bound(), None, |state, outcome| {
        assert_eq!(state.obstacles.len(), state.budget as usize);
        seen.push((*outcome, state.status));
    });

    assert_eq!(
        seen,
        vec![
            (TickOutcome::Advanced(pos(0, 1)), EngineStatus::Running),
            (TickOutcome::Shrunk(3), EngineStatus::Stuck { budget: 3 }),
            (TickOutcome::Shrunk(2), EngineStatus::Stuck { budget: 2 }),
            (TickOutcome::Shrunk(1), EngineStatus::Stuck { budget: 1 }),
            (TickOutcome::Shrunk(0), EngineStatus::Stuck { budget: 0 }),
            (TickOutcome::Advanced(pos(0, 2)), EngineStatus::Running),
            (TickOutcome::Advanced(pos(0, 3)), EngineStatus::Running),
            (TickOutcome::Advanced(pos(0, 4)), EngineStatus::Running),
            (TickOutcome::Advanced(pos(0, 5)), EngineStatus::Running),
            (TickOutcome::Advanced(pos(0, 6)), EngineStatus::Reached),
        ]
    );
    assert_eq!(report.outcome, RunOutcome::Reached);
    assert_eq!(report.ticks, 10);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.moves, 6);
    assert_eq!(snapshot.budget, 0);
    assert_trail_valid(&corridor, &snapshot);
}

#[test]
fn test_blocked_tick_shrinks_budget_without_moving() {
    let grid = grid(3, 3, (0, 0), (2, 2));
    let mut state = EngineState::new(&grid, 2);
    state.obstacles = obstacles_of(&[(0, 1), (1, 0)]);

    for fallback in [FallbackPolicy::Relocate, FallbackPolicy::Disabled] {
        let generator = ObstacleGenerator::default();
        let mut rng = seeded(5);
        let mut ctx = StepContext {
            grid: &grid,
            generator: &generator,
            fallback,
            rng: &mut rng,
        };

        let (next, outcome) = advance(&state, &mut ctx).unwrap();
        assert_eq!(outcome, TickOutcome::Shrunk(1));
        assert_eq!(next.budget, 1);
        assert_eq!(next.status, EngineStatus::Stuck { budget: 1 });
        assert_eq!(next.trail, state.trail);
        assert_eq!(next.obstacles.len(), 1);
        assert_eq!(next.ticks, 1);
        assert_eq!(next.moves, 0);
    }
}

#[test]
fn test_blocked_tick_at_zero_budget_is_exhausted() {
    let grid = grid(3, 3, (0, 0), (2, 2));
    let mut state = EngineState::new(&grid, 0);
    state.obstacles = obstacles_of(&[(0, 1), (1, 0)]);

    let generator = ObstacleGenerator::default();
    let mut rng = seeded(5);
    let mut ctx = StepContext {
        grid: &grid,
        generator: &generator,
        fallback: FallbackPolicy::Relocate,
        rng: &mut rng,
    };

    let (next, outcome) = advance(&state, &mut ctx).unwrap();
    assert_eq!(outcome, TickOutcome::Exhausted);
    assert_eq!(next.status, EngineStatus::Exhausted);
    assert_eq!(next.budget, 0);
    assert!(next.obstacles.is_empty());

    // Terminal: further ticks change nothing
    let (again, outcome) = advance(&next, &mut ctx).unwrap();
    assert_eq!(outcome, TickOutcome::Exhausted);
    assert_eq!(again, next);
}

#[test]
fn test_trapped_by_own_trail_exhausts() {
    // Agent on (0,1); trail and an obstacle cut it off from the end
    let grid = grid(2, 3, (1, 1), (1, 2));
    let mut state = EngineState::new(&grid, 0);
    state.trail = trail_of(&[(1, 1), (0, 1)]);
    state.obstacles = obstacles_of(&[(0, 2)]);

    let generator = ObstacleGenerator::default();
    let mut rng = seeded(0);
    let mut ctx = StepContext {
        grid: &grid,
        generator: &generator,
        fallback: FallbackPolicy::Relocate,
        rng: &mut rng,
    };

    let (next, outcome) = advance(&state, &mut ctx).unwrap();
    assert_eq!(outcome, TickOutcome::Exhausted);
    assert_eq!(next.trail, state.trail);
}

#[test]
fn test_unsatisfiable_halts_and_keeps_last_state() {
    // After the first move no free cell is left for the one obstacle
    let mut engine = Engine::configure(grid(1, 3, (0, 0), (0, 2)), 1).unwrap();

    assert_eq!(
        engine.tick(),
        Err(SimError::Unsatisfiable {
            requested: 1,
            available: 0
        })
    );
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.trail, positions(&[(0, 0)]));
    assert_eq!(snapshot.ticks, 0);
    assert_eq!(
        snapshot.status,
        EngineStatus::Unsatisfiable {
            requested: 1,
            available: 0
        }
    );
    assert!(engine.tick().is_err());

    let report = engine.run_to_completion(10);
    assert_eq!(report.ticks, 0);
    assert_eq!(
        report.outcome,
        RunOutcome::Unsatisfiable {
            requested: 1,
            available: 0
        }
    );

    engine.reset(grid(1, 3, (0, 0), (0, 2)), 0).unwrap();
    assert_eq!(engine.status(), EngineStatus::Running);
    assert_eq!(engine.run_to_completion(10).outcome, RunOutcome::Reached);
}

#[test]
fn test_unsatisfiable_inside_run() {
    let mut engine = Engine::configure(grid(1, 3, (0, 0), (0, 2)), 1).unwrap();
    let report = engine.run_to_completion(10);
    assert_eq!(report.ticks, 1);
    assert!(matches!(report.outcome, RunOutcome::Unsatisfiable { .. }));
}

#[test]
fn test_tick_limit_truncates_and_resumes() {
    let mut engine = Engine::configure(reference_grid(), 0).unwrap();

    let report = engine.run_to_completion(2);
    assert_eq!(report.outcome, RunOutcome::Truncated);
    assert_eq!(report.ticks, 2);
    assert_eq!(engine.snapshot().trail.len(), 3);

    let report = engine.run_to_completion(100);
    assert_eq!(report.outcome, RunOutcome::Reached);
    assert_eq!(report.ticks, 6);
}

#[test]
fn test_expired_deadline_does_no_work() {
    let mut engine = Engine::configure(reference_grid(), 0).unwrap();
    let report = engine.run_until(100, Some(Instant::now()));
    assert_eq!(report.outcome, RunOutcome::Truncated);
    assert_eq!(report.ticks, 0);
    assert_eq!(engine.snapshot().trail.len(), 1);
}

#[test]
fn test_ticks_iterator_stops_at_terminal() {
    let mut engine = Engine::configure(reference_grid(), 0).unwrap();
    let outcomes: Vec<_> = engine.ticks().collect::<Result<_, _>>().unwrap();

    assert_eq!(outcomes.len(), 8);
    assert!(outcomes.iter().all(|o| matches!(o, TickOutcome::Advanced(_))));
    assert_eq!(outcomes.last(), Some(&TickOutcome::Advanced(pos(4, 4))));
    assert_eq!(engine.ticks().count(), 0);
}

#[test]
fn test_obstacle_invariants_hold_every_tick() {
    let grid = grid(8, 8, (0, 0), (7, 7));
    for seed in 0..20 {
        let mut engine = Engine::with_options(grid.clone(), 10, options(seed)).unwrap();
        let max = engine.tick_bound();
        let mut previous_budget = 10;

        let report = engine.run_observed(max, None, |state, outcome| {
            let snapshot = state.snapshot();
            assert_obstacles_valid(&grid, &snapshot);
            assert_trail_valid(&grid, &snapshot);
            match outcome {
                TickOutcome::Advanced(cell) => {
                    assert_eq!(state.budget, previous_budget);
                    assert_eq!(snapshot.trail.last(), Some(cell));
                    if state.status == EngineStatus::Running {
                        assert_eq!(snapshot.obstacles.len(), state.budget as usize);
                    }
                }
                TickOutcome::Shrunk(budget) => {
                    assert_eq!(*budget + 1, previous_budget);
                    assert_eq!(snapshot.obstacles.len(), *budget as usize);
                }
                TickOutcome::Exhausted => assert_eq!(previous_budget, 0),
                TickOutcome::Reached => {}
            }
            previous_budget = state.budget;
        });

        assert_ne!(report.outcome, RunOutcome::Truncated, "seed {}", seed);
        assert!(report.ticks <= max);
    }
}

#[test]
fn test_reset_replays_identically() {
    let grid = reference_grid();
    let mut engine = Engine::with_options(grid.clone(), 4, options(1234)).unwrap();

    let mut first = Vec::new();
    engine.run_observed(200, None, |state, outcome| first.push((state.snapshot(), *outcome)));

    engine.reset(grid.clone(), 4).unwrap();
    assert_eq!(engine.snapshot().trail, positions(&[(0, 0)]));
    assert_eq!(engine.budget(), 4);

    let mut second = Vec::new();
    engine.run_observed(200, None, |state, outcome| second.push((state.snapshot(), *outcome)));
    assert_eq!(first, second);

    engine.restart();
    let mut other = Engine::with_options(grid, 4, options(1234)).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.tick(), other.tick());
        assert_eq!(engine.snapshot(), other.snapshot());
    }
}

#[test]
fn test_engines_are_independent() {
    let grid = reference_grid();
    let mut a = Engine::with_options(grid.clone(), 3, options(9)).unwrap();
    let mut b = Engine::with_options(grid, 3, options(9)).unwrap();

    a.run_to_completion(3);
    assert_eq!(b.snapshot().trail.len(), 1);
    b.run_to_completion(3);
    assert_eq!(a.snapshot(), b.snapshot());
}
