pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod obstacles;
pub mod pathfinding;
pub mod playback;
pub mod render;
pub mod step;
pub mod tick_log;
pub mod trail;

pub use engine::{Engine, EngineOptions, RunOutcome, RunReport};
pub use error::{SimError, SimResult};
pub use grid::{Grid, Position};
pub use obstacles::{ObstacleGenerator, ObstacleSet};
pub use pathfinding::{find_path, FallbackPolicy};
pub use step::{EngineState, EngineStatus, Snapshot, TickOutcome};
pub use trail::Trail;
