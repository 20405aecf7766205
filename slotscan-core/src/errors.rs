//! Error types for configuration and scanning
//!
//! ## Error Categories
//!
//! ### Configuration errors (fatal, raised at construction)
//! - `InvalidSampleInterval`: the assumed raster is zero, negative or not a number
//! - `InvalidDelay`: a delay threshold is negative or not a number
//! - `TooManyAccumulators`: the state machine's accumulator slots are full
//!
//! ### Caller contract breaches (raised while scanning)
//! - `OutOfOrder`: a sample's timestamp went backwards
//! - `InvalidTimestamp`: a sample's timestamp is NaN or infinite
//!
//! Neither category is retried. Both indicate a programming or configuration
//! mistake, never a transient condition, and no error is ever converted into a
//! default numeric result.
//!
//! ```rust
//! use slotscan_core::{ConfigError, DelayFilter};
//!
//! match DelayFilter::turn_on(0.5, 0.0) {
//!     Err(ConfigError::InvalidSampleInterval { interval }) => assert_eq!(interval, 0.0),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! Like every other type in the crate, errors stay `Copy` and carry only
//! inline data so they can cross `no_std` boundaries.

use thiserror_no_std::Error;

use crate::time::Timestamp;

/// Result type for construction and configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for scanning operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Invalid filter or machine configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Sample interval must be a positive, finite number of seconds
    #[error("Sample interval {interval}s must be positive and finite")]
    InvalidSampleInterval {
        /// Rejected interval in seconds
        interval: f64,
    },

    /// Delay threshold must be a non-negative number of seconds
    #[error("Delay {delay}s must be non-negative")]
    InvalidDelay {
        /// Rejected delay in seconds
        delay: f64,
    },

    /// No room left for another accumulator
    #[error("Accumulator capacity {capacity} exceeded")]
    TooManyAccumulators {
        /// Maximum accumulators per state machine
        capacity: usize,
    },
}

/// Failures while driving samples through a scanner
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ScanError {
    /// Sample presented before its predecessor
    #[error("Sample at {current}s arrived after {previous}s")]
    OutOfOrder {
        /// Timestamp of the last accepted sample
        previous: Timestamp,
        /// Rejected timestamp
        current: Timestamp,
    },

    /// Timestamp is NaN or infinite
    #[error("Invalid timestamp: not a finite number")]
    InvalidTimestamp,

    /// Sample source failed
    #[error("Sample source failed: {reason}")]
    Source {
        /// What went wrong
        reason: &'static str,
    },

    /// Configuration rejected while building the scanner
    #[error("Configuration error: {0}")]
    Config(ConfigError),
}

impl From<ConfigError> for ScanError {
    fn from(err: ConfigError) -> Self {
        ScanError::Config(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidSampleInterval { interval } =>
                defmt::write!(fmt, "Sample interval {} invalid", interval),
            Self::InvalidDelay { delay } =>
                defmt::write!(fmt, "Delay {} invalid", delay),
            Self::TooManyAccumulators { capacity } =>
                defmt::write!(fmt, "Accumulator capacity {} exceeded", capacity),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ScanError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::OutOfOrder { previous, current } =>
                defmt::write!(fmt, "Sample {} after {}", current, previous),
            Self::InvalidTimestamp =>
                defmt::write!(fmt, "Invalid timestamp"),
            Self::Source { reason } =>
                defmt::write!(fmt, "Source: {}", reason),
            Self::Config(err) =>
                defmt::write!(fmt, "Config: {}", err),
        }
    }
}
