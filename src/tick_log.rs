use crate::step::{EngineStatus, TickOutcome};
use serde::Serialize;
use std::time::Instant;

/// One committed tick with its timestamp
#[derive(Clone, Debug, Serialize)]
pub struct LoggedTick {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub tick: u64,
    pub outcome: TickOutcome,
    pub budget: u32,
    pub status: EngineStatus,
}

/// Tick logger
pub struct TickLog {
    start_time: Instant,
    ticks: Vec<LoggedTick>,
}

impl Default for TickLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TickLog {
    pub fn new() -> Self {
        TickLog {
            start_time: Instant::now(),
            ticks: Vec::new(),
        }
    }

    pub fn record(&mut self, tick: u64, outcome: TickOutcome, budget: u32, status: EngineStatus) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.ticks.push(LoggedTick {
            timestamp_ms,
            tick,
            outcome,
            budget,
            status,
        });
    }

    pub fn entries(&self) -> &[LoggedTick] {
        &self.ticks
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.ticks)
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut advanced = 0;
        let mut shrunk = 0;
        let mut lowest_budget = None;

        for logged in &self.ticks {
            match logged.outcome {
                TickOutcome::Advanced(_) => advanced += 1,
                TickOutcome::Shrunk(budget) => {
                    shrunk += 1;
                    lowest_budget = Some(lowest_budget.map_or(budget, |b: u32| b.min(budget)));
                }
                TickOutcome::Reached | TickOutcome::Exhausted => {}
            }
        }

        let duration = self.ticks.last().map_or(0, |last| last.timestamp_ms);
        let final_status = self
            .ticks
            .last()
            .map_or_else(|| "none".to_string(), |last| format!("{:?}", last.status));

        format!(
            "Run Duration: {}ms\n\
             Ticks: {} ({} advanced, {} shrunk)\n\
             Lowest Budget: {}\n\
             Final Status: {}",
            duration,
            self.ticks.len(),
            advanced,
            shrunk,
            lowest_budget.map_or_else(|| "-".to_string(), |b| b.to_string()),
            final_status
        )
    }
}
