use thiserror::Error;

#[derive(Error, Debug)]
pub enum DayError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid speed multiplier: {value} (must be finite and > 0)")]
    InvalidSpeed { value: f64 },

    #[error("Session not running")]
    SessionNotRunning,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DayResult<T> = Result<T, DayError>;
