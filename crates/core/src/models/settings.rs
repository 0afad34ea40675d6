use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

use super::filter::BrowseFilters;
use super::records::MAX_RECENT;

/// User-configurable settings, stored in the local store next to the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Chance (0.0 to 1.0) that a competing bidder answers an accepted bid.
    pub outbid_probability: f64,

    /// Counter-bid delay window in milliseconds, `[min, max)`.
    pub counter_bid_min_delay_ms: u64,
    pub counter_bid_max_delay_ms: u64,

    /// How many recently viewed listings are remembered, `1..=8`.
    pub recent_limit: usize,

    /// Filters used when nothing has been persisted yet (and on reset).
    pub default_filters: BrowseFilters,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            outbid_probability: 0.45,
            counter_bid_min_delay_ms: 1200,
            counter_bid_max_delay_ms: 3000,
            recent_limit: MAX_RECENT,
            default_filters: BrowseFilters::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.outbid_probability) {
            return Err(CoreError::Validation(format!(
                "outbid probability {} must be within 0..=1",
                self.outbid_probability
            )));
        }
        if self.counter_bid_min_delay_ms > self.counter_bid_max_delay_ms {
            return Err(CoreError::Validation(format!(
                "counter-bid delay window is inverted ({}ms > {}ms)",
                self.counter_bid_min_delay_ms, self.counter_bid_max_delay_ms
            )));
        }
        if !(1..=MAX_RECENT).contains(&self.recent_limit) {
            return Err(CoreError::Validation(format!(
                "recent limit {} must be within 1..={MAX_RECENT}",
                self.recent_limit
            )));
        }
        Ok(())
    }

    /// Pick a counter-bid delay from the window given a uniform sample in `[0, 1)`.
    pub fn counter_bid_delay(&self, sample: f64) -> Duration {
        let span = self
            .counter_bid_max_delay_ms
            .saturating_sub(self.counter_bid_min_delay_ms);
        let offset = (sample.clamp(0.0, 1.0) * span as f64).floor() as u64;
        // sample == 1.0 would land on the exclusive upper bound
        let offset = offset.min(span.saturating_sub(1));
        Duration::from_millis(self.counter_bid_min_delay_ms + offset)
    }
}
