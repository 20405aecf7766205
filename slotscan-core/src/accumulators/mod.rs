//! Per-window accumulators
//!
//! ## Overview
//!
//! An accumulator computes one number per window. The state machine resets
//! it when a window opens, updates it for every sample strictly between the
//! opening and closing samples, and reads it when the window closes:
//!
//! ```text
//! sample   s0      s1      s2      s3      s4
//! entry    T
//! exit                                     T
//! call     reset   update  update  update  value
//! ```
//!
//! ## Shipped Accumulators
//!
//! - [`Counter`]: number of in-window samples
//! - [`Sum`]: running total of an extracted signal
//! - [`Minimum`] / [`Maximum`]: extrema of an extracted signal
//! - [`Mean`]: arithmetic mean of an extracted signal
//!
//! The signal-based accumulators take an extractor closure `Fn(&S) -> f64`,
//! which is also how custom expressions plug in:
//!
//! ```rust
//! use slotscan_core::{Maximum, Sum, WindowStateMachine};
//!
//! struct Frame { speed: f64, load: f64 }
//!
//! let mut machine = WindowStateMachine::<Frame>::with_re_entry(false);
//! machine.load(Maximum::new(|f: &Frame| f.speed))?;
//! machine.load(Sum::new(|f: &Frame| f.speed * f.load / 100.0))?;
//! # Ok::<(), slotscan_core::ConfigError>(())
//! ```
//!
//! Anything else implements [`Accumulator`](crate::Accumulator) directly.

mod counter;
mod statistics;

pub use counter::Counter;
pub use statistics::{Maximum, Mean, Minimum, Sum};
