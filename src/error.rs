use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// `Exhausted` is deliberately absent: it is a tick outcome, not a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Cannot place {requested} obstacles: only {available} free cells")]
    Unsatisfiable { requested: u32, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SimError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
