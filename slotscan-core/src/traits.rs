//! Core traits
//!
//! - [`Accumulator`]: per-window computation plugged into the state machine
//! - [`Stream`]: pull-based sample source
//!
//! Keep them small. Anything with reset/update/value semantics is an
//! accumulator; anything that can hand out samples one at a time is a stream.

/// Per-window computation
///
/// The state machine calls `reset` when a window opens (or re-opens), `update`
/// once for every sample strictly inside the window, and `value` when the
/// window closes. The opening sample and the closing sample never reach
/// `update`.
///
/// `S` is the sample payload handed to `update`. Accumulators that only count
/// ignore it, so the default is `()`.
///
/// ## Example: duration above a limit
///
/// ```rust
/// use slotscan_core::{Accumulator, WindowStateMachine};
///
/// struct TimeAbove {
///     limit: f64,
///     dt: f64,
///     seconds: f64,
/// }
///
/// impl Accumulator<f64> for TimeAbove {
///     fn reset(&mut self) {
///         self.seconds = 0.0;
///     }
///
///     fn update(&mut self, value: &f64) {
///         if *value > self.limit {
///             self.seconds += self.dt;
///         }
///     }
///
///     fn value(&self) -> f64 {
///         self.seconds
///     }
///
///     fn name(&self) -> &str {
///         "time_above"
///     }
/// }
///
/// let mut machine = WindowStateMachine::<f64>::with_re_entry(false);
/// machine.load(TimeAbove { limit: 90.0, dt: 0.02, seconds: 0.0 })?;
/// # Ok::<(), slotscan_core::ConfigError>(())
/// ```
pub trait Accumulator<S: ?Sized = ()> {
    /// Return to the state right after construction
    fn reset(&mut self);

    /// Fold one in-window sample into the result
    fn update(&mut self, sample: &S);

    /// Current result, without side effects
    fn value(&self) -> f64;

    /// Name used in logs
    fn name(&self) -> &str {
        "accumulator"
    }
}

/// Pull-based sample source
///
/// Mirrors `Iterator`, but with `nb::Result` so sources backed by hardware or
/// buffers can report "nothing yet" without blocking:
///
/// - `Ok(item)`: next sample
/// - `Err(nb::Error::WouldBlock)`: no sample available yet
/// - `Err(nb::Error::Other(e))`: source error, including end of stream
///
/// ```rust
/// use slotscan_core::{Sample, Stream};
/// use slotscan_core::stream::{MemoryStream, StreamError};
///
/// let samples = [Sample::new(0.0, 1.0), Sample::new(0.02, 2.0)];
/// let mut stream = MemoryStream::new(&samples);
///
/// let mut total = 0.0;
/// loop {
///     match stream.poll_next() {
///         Ok(sample) => total += sample.data,
///         Err(nb::Error::WouldBlock) => continue,
///         Err(nb::Error::Other(StreamError::EndOfStream)) => break,
///         Err(nb::Error::Other(_)) => break,
///     }
/// }
/// assert_eq!(total, 3.0);
/// ```
pub trait Stream {
    /// Type of items produced by the stream
    type Item;

    /// Type of errors that can occur
    type Error;

    /// Attempt to pull the next item
    ///
    /// End of stream should be reported consistently once reached.
    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error>;

    /// Bounds on remaining items, like `Iterator::size_hint`
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}
