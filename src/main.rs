use shiftgrid::config::Config;
use shiftgrid::playback::Playback;
use shiftgrid::render::render_snapshot;
use shiftgrid::tick_log::TickLog;
use shiftgrid::{Engine, RunOutcome};
use std::error::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load();
    let grid = config.grid()?;
    let budget = config.scenario.obstacle_budget;

    info!(
        "Scenario: {}x{} grid, {} -> {}, {} obstacles, seed {}",
        grid.rows(),
        grid.cols(),
        grid.start(),
        grid.end(),
        budget,
        config.generator.seed
    );

    let mut engine = Engine::with_options(grid.clone(), budget, config.engine_options())?;
    let max_ticks = config.max_ticks().unwrap_or_else(|| engine.tick_bound());
    let mut log = TickLog::new();

    let report = if config.playback.animations {
        let playback = Playback::new(config.delay(), max_ticks);
        playback.play(&mut engine, |snapshot, outcome| {
            println!("tick {}: {:?}", snapshot.ticks, outcome);
            println!("{}", render_snapshot(&grid, snapshot));
            log.record(snapshot.ticks, *outcome, snapshot.budget, snapshot.status);
        })
    } else {
        engine.run_observed(max_ticks, None, |state, outcome| {
            log.record(state.ticks, *outcome, state.budget, state.status);
        })
    };

    let snapshot = engine.snapshot();
    println!("{}", render_snapshot(&grid, &snapshot));
    match report.outcome {
        RunOutcome::Reached => info!(
            "Reached {} in {} ticks ({} moves), {:?}",
            grid.end(), report.ticks, snapshot.moves, report.elapsed
        ),
        RunOutcome::Exhausted => warn!(
            "Exhausted after {} ticks: no path even with zero obstacles",
            report.ticks
        ),
        RunOutcome::Truncated => warn!("Stopped after {} ticks without finishing", report.ticks),
        RunOutcome::Unsatisfiable {
            requested,
            available,
        } => error!(
            "Halted: {} obstacles requested, {} free cells",
            requested, available
        ),
    }
    println!("{}", log.summary());

    if config.logging.enable_tick_log {
        match log.save_to_file(&config.logging.tick_log_path) {
            Ok(()) => info!("Tick log written to {}", config.logging.tick_log_path),
            Err(e) => error!("Failed to write tick log: {}", e),
        }
    }

    Ok(())
}
