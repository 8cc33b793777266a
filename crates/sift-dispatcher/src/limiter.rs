//! Quota accounting and call pacing
//!
//! One limiter instance owns the run's quota state and rate state. All
//! mutation goes through its methods:
//!
//! - `try_acquire` before a call: refuses when no units are left
//! - `wait_turn` before a call: waits out the minimum spacing
//! - `mark_called` after every attempted call, successful or not
//! - `record_result` with the units the service reported
//!
//! The service's `units_left` is authoritative and overwrites the local
//! count. Without a report the local count is decremented by one.

use crate::error::DispatchError;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Quota-gated rate limiter for a single run
#[derive(Debug)]
pub struct QuotaGatedLimiter {
    units_left: u64,
    min_interval: Duration,
    last_call_end: Option<Instant>,
}

impl QuotaGatedLimiter {
    /// Create a limiter with a starting quota and minimum call spacing
    pub fn new(starting_units: u64, min_interval: Duration) -> Self {
        Self {
            units_left: starting_units,
            min_interval,
            last_call_end: None,
        }
    }

    /// Units the run may still spend
    pub fn units_left(&self) -> u64 {
        self.units_left
    }

    /// Minimum spacing between calls
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Check that a call may be issued
    ///
    /// # Errors
    ///
    /// [`DispatchError::QuotaExhausted`] when no units are left. The run must
    /// stop; this is not a per-unit skip.
    pub fn try_acquire(&self) -> Result<(), DispatchError> {
        if self.units_left == 0 {
            return Err(DispatchError::QuotaExhausted);
        }
        Ok(())
    }

    /// Wait until the next call may start
    ///
    /// Returns immediately before the first call of a run.
    pub async fn wait_turn(&self) {
        if let Some(ready_at) = self.next_call_at() {
            let now = Instant::now();
            if ready_at > now {
                debug!("Pacing: waiting {:?} before next call", ready_at - now);
                sleep_until(ready_at).await;
            }
        }
    }

    /// Earliest instant the next call may start, if a call was made
    pub fn next_call_at(&self) -> Option<Instant> {
        self.last_call_end.map(|end| end + self.min_interval)
    }

    /// Record that a call has just ended
    pub fn mark_called(&mut self) {
        self.last_call_end = Some(Instant::now());
    }

    /// Update the quota from the service's report
    ///
    /// Negative reports are clamped to zero.
    pub fn record_result(&mut self, reported_units_left: Option<i64>) {
        match reported_units_left {
            Some(units) if units < 0 => {
                warn!("Service reported negative units left ({}), treating as 0", units);
                self.units_left = 0;
            }
            Some(units) => {
                self.units_left = units as u64;
            }
            None => {
                self.units_left = self.units_left.saturating_sub(1);
                debug!("No units reported, local count now {}", self.units_left);
            }
        }
    }
}
