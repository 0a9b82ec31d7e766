//! Release event trains for release-triggered jobs.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimulationWindow;
use crate::core::SimulationError;

/// Inter-arrival bounds of upstream releases, in whole hours.
///
/// Each gap is drawn uniformly from `min_hours..=max_hours`; the reference
/// cadence of 4 to 8 hours averages one release every 6 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseCadence {
    /// Shortest gap between two releases.
    pub min_hours: u32,
    /// Longest gap between two releases.
    pub max_hours: u32,
}

impl Default for ReleaseCadence {
    fn default() -> Self {
        Self {
            min_hours: 4,
            max_hours: 8,
        }
    }
}

impl ReleaseCadence {
    /// Validate cadence bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_hours == 0 {
            return Err("release interval min_hours must be greater than 0".into());
        }
        if self.min_hours > self.max_hours {
            return Err(format!(
                "release interval min_hours ({}) exceeds max_hours ({})",
                self.min_hours, self.max_hours
            ));
        }
        Ok(())
    }

    /// Release instants within `window`, the first one at the window start.
    ///
    /// Fails with [`SimulationError::Config`] when the bounds are invalid,
    /// since an inverted range cannot be sampled and a zero gap never advances.
    pub fn release_train<R: Rng>(
        &self,
        window: SimulationWindow,
        rng: &mut R,
    ) -> Result<Vec<DateTime<Utc>>, SimulationError> {
        self.validate().map_err(SimulationError::Config)?;
        let mut releases = Vec::new();
        let mut at = window.start;
        while at < window.end {
            releases.push(at);
            let gap = rng.random_range(self.min_hours..=self.max_hours);
            at = at + Duration::hours(i64::from(gap));
        }
        Ok(releases)
    }
}
