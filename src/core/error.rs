//! Error types for simulation operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by simulation components.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration failed validation or could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A cron expression could not be parsed.
    #[error("invalid cron schedule `{schedule}`: {reason}")]
    Schedule {
        /// The offending expression.
        schedule: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// Engine bookkeeping reached an impossible state.
    #[error("simulation invariant violated at {at}: {detail}")]
    Invariant {
        /// Virtual time of the failing tick.
        at: DateTime<Utc>,
        /// What went wrong.
        detail: String,
    },
    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    pub(crate) fn invariant(at: DateTime<Utc>, detail: impl Into<String>) -> Self {
        Self::Invariant {
            at,
            detail: detail.into(),
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
