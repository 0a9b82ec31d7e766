//! Cron occurrence oracle.
//!
//! The generator only needs "next occurrence at or after T". That question is
//! behind [`OccurrenceOracle`], and turning an expression into an oracle is
//! behind [`ScheduleParser`], so tests can substitute a fixed schedule.

use std::fmt;

use chrono::{DateTime, Utc};
use croner::Cron;

use crate::core::SimulationError;

/// Answers "when is the next occurrence at or after `from`?".
pub trait OccurrenceOracle {
    /// Next occurrence at or after `from`, or `None` if there is none.
    fn next_at_or_after(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Turns a schedule expression into an [`OccurrenceOracle`].
pub trait ScheduleParser {
    /// Oracle produced for a valid expression.
    type Oracle: OccurrenceOracle;

    /// Parse `expression`, reporting malformed input as [`SimulationError::Schedule`].
    fn parse(&self, expression: &str) -> Result<Self::Oracle, SimulationError>;
}

/// Standard five-field cron parser (minute, hour, day of month, month, day of week).
#[derive(Debug, Clone, Copy, Default)]
pub struct CronParser;

impl ScheduleParser for CronParser {
    type Oracle = CronSchedule;

    fn parse(&self, expression: &str) -> Result<CronSchedule, SimulationError> {
        CronSchedule::parse(expression)
    }
}

/// A parsed cron expression.
pub struct CronSchedule {
    expression: String,
    cron: Cron,
}

impl CronSchedule {
    /// Parse a five-field cron expression.
    pub fn parse(expression: &str) -> Result<Self, SimulationError> {
        let cron = Cron::new(expression)
            .parse()
            .map_err(|e| SimulationError::Schedule {
                schedule: expression.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            expression: expression.to_string(),
            cron,
        })
    }

    /// Source expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl fmt::Debug for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CronSchedule")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

impl OccurrenceOracle for CronSchedule {
    fn next_at_or_after(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.cron.find_next_occurrence(&from, true).ok()
    }
}
