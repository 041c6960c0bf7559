use crate::engine::EngineOptions;
use crate::error::{SimError, SimResult};
use crate::grid::{Grid, Position};
use crate::obstacles::DEFAULT_ATTEMPTS_PER_CELL;
use crate::pathfinding::FallbackPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_columns")]
    pub columns: i32,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub start_x: i32,
    #[serde(default)]
    pub start_y: i32,
    #[serde(default = "default_end_x")]
    pub end_x: i32,
    #[serde(default = "default_end_y")]
    pub end_y: i32,
    #[serde(default = "default_obstacle_budget")]
    pub obstacle_budget: u32,
    /// 0 means use `Engine::tick_bound`
    #[serde(default)]
    pub max_ticks: u64,
}

#[derive(Debug, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_attempts_per_cell")]
    pub attempts_per_cell: u32,
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub animations: bool,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_tick_log: bool,
    #[serde(default = "default_tick_log_path")]
    pub tick_log_path: String,
}

// Default values
fn default_rows() -> i32 { 5 }
fn default_columns() -> i32 { 5 }
fn default_end_x() -> i32 { 4 }
fn default_end_y() -> i32 { 4 }
fn default_obstacle_budget() -> u32 { 3 }
fn default_attempts_per_cell() -> u32 { DEFAULT_ATTEMPTS_PER_CELL }
fn default_delay_ms() -> u64 { 100 }
fn default_tick_log_path() -> String { "tick_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            columns: default_columns(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start_x: 0,
            start_y: 0,
            end_x: default_end_x(),
            end_y: default_end_y(),
            obstacle_budget: default_obstacle_budget(),
            max_ticks: 0,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            attempts_per_cell: default_attempts_per_cell(),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            animations: false,
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_tick_log: false,
            tick_log_path: default_tick_log_path(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, or use defaults if the
    /// file is missing or unparsable
    pub fn load() -> Self {
        match Self::load_from(DEFAULT_CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded configuration from {}", DEFAULT_CONFIG_PATH);
                config
            }
            Err(e) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                warn!("Failed to parse {}: {}", DEFAULT_CONFIG_PATH, e);
                warn!("Using default configuration");
                Config::default()
            }
            Err(_) => {
                info!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
                Config::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> SimResult<Self> {
        toml::from_str(contents).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Validated grid for the configured scenario
    pub fn grid(&self) -> SimResult<Grid> {
        Grid::new(
            self.grid.rows,
            self.grid.columns,
            Position::new(self.scenario.start_x, self.scenario.start_y),
            Position::new(self.scenario.end_x, self.scenario.end_y),
        )
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            seed: self.generator.seed,
            attempts_per_cell: self.generator.attempts_per_cell,
            fallback: self.generator.fallback,
        }
    }

    /// `None` when the limit should be derived from the engine
    pub fn max_ticks(&self) -> Option<u64> {
        (self.scenario.max_ticks > 0).then_some(self.scenario.max_ticks)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.playback.delay_ms)
    }
}
