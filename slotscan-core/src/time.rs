//! Time base for sample streams
//!
//! Timestamps are seconds on the stream's own logical clock (typically the
//! offset from the start of a recording). Streams are expected to be
//! resampled onto a fixed raster before they reach this crate; see
//! [`constants::DEFAULT_SAMPLE_INTERVAL_S`](crate::constants::DEFAULT_SAMPLE_INTERVAL_S).

use crate::errors::{ScanError, ScanResult};

/// Timestamp in seconds
pub type Timestamp = f64;

/// Tracks the last accepted timestamp and rejects samples that go backwards
///
/// Equal timestamps are accepted; the stream only has to be non-decreasing.
/// A repeated timestamp is still a precondition violation for the delay
/// filters: they count samples, so a duplicate adds a full sample interval
/// of elapsed time that never happened. Deduplicate streams before scanning.
/// A rejected timestamp does not move the guard.
#[derive(Debug, Clone, Default)]
pub struct OrderGuard {
    last: Option<Timestamp>,
}

impl OrderGuard {
    /// Create a guard that accepts any first timestamp
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Accept `timestamp` if it is finite and not earlier than the last one
    pub fn accept(&mut self, timestamp: Timestamp) -> ScanResult<()> {
        if !timestamp.is_finite() {
            log_warn!("Rejected non-finite timestamp {}", timestamp);
            return Err(ScanError::InvalidTimestamp);
        }

        if let Some(previous) = self.last {
            if timestamp < previous {
                log_warn!("Sample at {}s arrived after {}s", timestamp, previous);
                return Err(ScanError::OutOfOrder {
                    previous,
                    current: timestamp,
                });
            }
        }

        self.last = Some(timestamp);
        Ok(())
    }

    /// Last accepted timestamp
    pub fn last(&self) -> Option<Timestamp> {
        self.last
    }

    /// Forget history
    pub fn reset(&mut self) {
        self.last = None;
    }
}
