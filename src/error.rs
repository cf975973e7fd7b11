use chrono::{DateTime, Utc};
use thiserror::Error;

/// Gate engine error types.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Insufficient data for {indicator}: need {required} bars, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Degenerate input for {indicator}: {reason}")]
    Degenerate {
        indicator: &'static str,
        reason: String,
    },

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    #[error("Bar at {got} is not after the last bar at {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        got: DateTime<Utc>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl GateError {
    /// Shorthand for an insufficient-data error.
    pub fn insufficient(indicator: &'static str, required: usize, actual: usize) -> Self {
        GateError::InsufficientData {
            indicator,
            required,
            actual,
        }
    }

    /// Shorthand for a numeric degeneracy error.
    pub fn degenerate(indicator: &'static str, reason: impl Into<String>) -> Self {
        GateError::Degenerate {
            indicator,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
