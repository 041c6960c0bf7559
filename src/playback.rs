use crate::engine::{Engine, RunReport};
use crate::step::{Snapshot, TickOutcome};
use std::thread;
use std::time::Duration;

/// Paces ticks for a viewer: one tick, one callback, then a fixed pause.
///
/// The engine itself has no notion of time; this is the only place that
/// sleeps.
#[derive(Debug, Clone, Copy)]
pub struct Playback {
    pub delay: Duration,
    pub max_ticks: u64,
}

impl Playback {
    pub fn new(delay: Duration, max_ticks: u64) -> Self {
        Playback { delay, max_ticks }
    }

    /// Run `engine` to a terminal state (or `max_ticks`), handing each
    /// committed tick to `on_tick` before sleeping.
    pub fn play<F>(&self, engine: &mut Engine, mut on_tick: F) -> RunReport
    where
        F: FnMut(&Snapshot, &TickOutcome),
    {
        let delay = self.delay;
        engine.run_observed(self.max_ticks, None, |state, outcome| {
            on_tick(&state.snapshot(), outcome);
            if !state.status.is_terminal() && !delay.is_zero() {
                thread::sleep(delay);
            }
        })
    }
}
