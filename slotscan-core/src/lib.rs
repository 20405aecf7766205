//! Debounced window detection over ordered sample streams
//!
//! Finds the time windows ("slots") in a measurement stream during which an
//! entry condition held until an exit condition fired, and computes per-window
//! results from the samples seen inside each window.
//!
//! The core is three pieces:
//! - [`DelayFilter`]: turn-on / turn-off debouncing of instantaneous conditions
//! - [`Accumulator`]: pluggable per-window computation (the [`Counter`] ships by default)
//! - [`WindowStateMachine`]: entry/exit detection and window lifecycle
//!
//! [`SlotScanner`] wires them together for callers that just want to push
//! samples through raw predicates.
//!
//! ```rust
//! use slotscan_core::{Counter, WindowStateMachine};
//!
//! let mut machine = WindowStateMachine::new(false);
//! machine.load(Counter::new())?;
//!
//! let entry = [true, false, false, false, false];
//! let exit = [false, false, false, false, true];
//! let mut windows = Vec::new();
//! for (i, (&entry, &exit)) in entry.iter().zip(exit.iter()).enumerate() {
//!     if let Some(window) = machine.run(entry, exit, i as f64 * 0.02) {
//!         windows.push(window);
//!     }
//! }
//!
//! assert_eq!(windows.len(), 1);
//! assert_eq!(windows[0].outputs.as_slice(), &[3.0]);
//! # Ok::<(), slotscan_core::ConfigError>(())
//! ```
//!
//! Samples must arrive in non-decreasing timestamp order, on the fixed
//! raster the delay filters assume. The state machine trusts its caller;
//! [`SlotScanner`] checks ordering and fails fast.
//!
//! ## Features
//!
//! - `std` (default): serde derives and `log` output
//! - `stream-memory` (default): [`stream::MemoryStream`]
//! - `stream-csv` (default, needs `std`): `stream::CsvStream` over resampled
//!   CSV tables
//! - `embedded`: `defmt` formatting for errors
//!
//! `cargo test` covers all default features, CSV streaming included.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

// Logging macros, no-ops without the `log` feature
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod accumulators;
pub mod config;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod machine;
pub mod scan;
pub mod stream;
pub mod time;
pub mod traits;

// Public API
pub use accumulators::{Counter, Maximum, Mean, Minimum, Sum};
pub use config::{FilterConfig, ScanConfig};
pub use errors::{ConfigError, ConfigResult, ScanError, ScanResult};
pub use filter::{DelayFilter, DelayKind, DelayState};
pub use machine::{MachineState, Mode, Transition, WindowResult, WindowStateMachine};
pub use scan::{Sample, ScanInterrupted, ScanStats, SlotScanner};
pub use time::{OrderGuard, Timestamp};
pub use traits::{Accumulator, Stream};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
