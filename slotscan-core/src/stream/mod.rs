//! Sample sources
//!
//! The core consumes samples one at a time; this module provides sources that
//! hand them out through the pull-based [`Stream`] trait:
//! - `memory` - replay of an in-memory slice (tests, recorded data)
//! - `csv` - already-resampled signal tables on disk (requires `stream-csv`)
//!
//! Decoding measurement file formats and resampling channels onto a common
//! raster happen upstream; by the time data reaches these sources it is one
//! row per raster step.

use core::fmt;

#[cfg(feature = "stream-memory")]
pub mod memory;

#[cfg(feature = "stream-csv")]
pub mod csv;

#[cfg(feature = "stream-memory")]
pub use memory::MemoryStream;

#[cfg(feature = "stream-csv")]
pub use csv::{CsvStream, CsvStreamStats};

/// Errors that can occur while pulling samples
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// Transport-level error (e.g., I/O error)
    Transport(E),
    /// Data format error
    Format(&'static str),
    /// End of stream reached
    EndOfStream,
}

impl<E> StreamError<E> {
    /// Static description, detached from the transport error
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport error",
            Self::Format(msg) => *msg,
            Self::EndOfStream => "end of stream",
        }
    }
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::EndOfStream => write!(f, "End of stream"),
        }
    }
}

// Re-export trait for convenience
pub use crate::traits::Stream;
