//! Shared constants
//!
//! Defaults match the usual raster for resampled CAN/XCP measurements.

/// Default assumed spacing between consecutive samples (50 Hz)
pub const DEFAULT_SAMPLE_INTERVAL_S: f64 = 0.02;

/// Default delay threshold: pass-through
pub const DEFAULT_DELAY_S: f64 = 0.0;

/// Maximum accumulators one state machine can hold
///
/// Bounds the inline storage of [`WindowResult`](crate::WindowResult) outputs.
pub const MAX_ACCUMULATORS: usize = 16;

/// Fraction of one sample interval tolerated when comparing an elapsed
/// filter timer against its threshold
///
/// Keeps thresholds that are whole multiples of the interval latching on the
/// expected tick whichever way the products round.
pub const TIMER_TOLERANCE: f64 = 1e-6;
