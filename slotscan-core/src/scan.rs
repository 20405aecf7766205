//! Sample-by-sample scan driver
//!
//! [`SlotScanner`] is the glue a caller would otherwise write around the core:
//! evaluate raw predicates on each sample, debounce them, and feed the state
//! machine.
//!
//! ```text
//! Sample ─┬─ entry_condition ─► turn-on delay ──┐
//!         │                                     ├─► WindowStateMachine ─► WindowResult
//!         └─ exit_condition  ─► turn-off delay ─┘
//! ```
//!
//! Unlike the bare state machine, the scanner checks the ordering contract
//! and fails fast on a timestamp that goes backwards or is not finite. The
//! rejected sample touches no filter or window state, so the caller may skip
//! it and continue. Windows closed before the failure are never dropped:
//! `scan_into`/`drain_into` have already appended them, and `scan`/`drain`
//! return them inside [`ScanInterrupted`].
//!
//! Repeated timestamps pass the ordering check, but each one still advances
//! the delay timers by a full sample interval. A stream with duplicates is
//! off the fixed raster and its delay timing is wrong; deduplicate before
//! scanning.
//!
//! ## Example
//!
//! ```rust
//! use slotscan_core::{Counter, Sample, ScanConfig, SlotScanner};
//!
//! struct Frame { engine_speed: f64 }
//!
//! let config = ScanConfig::default().with_entry_delay(0.04);
//! let mut scanner = SlotScanner::new(
//!     &config,
//!     |f: &Frame| f.engine_speed > 3680.0,
//!     |f: &Frame| f.engine_speed < 3400.0,
//! )?;
//! scanner.load(Counter::new())?;
//!
//! let speeds = [3000.0, 3700.0, 3700.0, 3700.0, 3600.0, 3300.0];
//! let samples: Vec<_> = speeds
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &s)| Sample::new(i as f64 * 0.02, Frame { engine_speed: s }))
//!     .collect();
//!
//! let mut windows = Vec::new();
//! scanner.scan_into(&samples, &mut windows)?;
//! assert_eq!(windows.len(), 1);
//! assert_eq!(windows[0].window_start, 0.06);
//! assert_eq!(windows[0].outputs.as_slice(), &[1.0]);
//! # Ok::<(), slotscan_core::ScanError>(())
//! ```

use alloc::vec::Vec;
use core::fmt;

use thiserror_no_std::Error;

use crate::{
    config::ScanConfig,
    errors::{ConfigResult, ScanError, ScanResult},
    filter::{DelayFilter, DelayKind},
    machine::{WindowResult, WindowStateMachine},
    stream::StreamError,
    time::{OrderGuard, Timestamp},
    traits::{Accumulator, Stream},
};

/// One timestamped sample
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample<S> {
    /// Seconds, non-decreasing along the stream
    pub timestamp: Timestamp,
    /// Signal values the predicates and accumulators read
    pub data: S,
}

impl<S> Sample<S> {
    /// Pair a timestamp with its data
    pub fn new(timestamp: Timestamp, data: S) -> Self {
        Self { timestamp, data }
    }
}

/// A scan stopped early, with the windows it closed before stopping
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{error} ({} windows closed before the failure)", .windows.len())]
pub struct ScanInterrupted {
    /// Windows closed before the failure, in order
    pub windows: Vec<WindowResult>,
    /// What stopped the scan
    pub error: ScanError,
}

/// Counters over a scanner's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Samples accepted and processed
    pub samples: u64,
    /// Samples rejected for ordering or timestamp errors
    pub rejected: u64,
    /// Samples where the debounced entry condition held
    pub entry_steps: u64,
    /// Samples where the debounced exit condition held
    pub exit_steps: u64,
    /// Windows emitted
    pub windows: u64,
    /// Malformed records skipped while draining a stream
    pub malformed: u64,
}

/// Drives samples through predicates, delay filters and a state machine
pub struct SlotScanner<S, E, X> {
    entry_condition: E,
    exit_condition: X,
    entry_filter: DelayFilter,
    exit_filter: DelayFilter,
    machine: WindowStateMachine<S>,
    order: OrderGuard,
    stats: ScanStats,
}

impl<S, E, X> SlotScanner<S, E, X>
where
    E: Fn(&S) -> bool,
    X: Fn(&S) -> bool,
{
    /// Turn-on delay on entry, turn-off delay on exit, as configured
    pub fn new(config: &ScanConfig, entry_condition: E, exit_condition: X) -> ConfigResult<Self> {
        config.validate()?;

        let entry_filter = DelayFilter::new(DelayKind::TurnOn, config.entry_filter())?;
        let exit_filter = DelayFilter::new(DelayKind::TurnOff, config.exit_filter())?;

        Ok(Self::with_parts(
            entry_condition,
            entry_filter,
            exit_condition,
            exit_filter,
            WindowStateMachine::with_re_entry(config.re_entry),
        ))
    }

    /// Assemble from pre-built filters and machine
    pub fn with_parts(
        entry_condition: E,
        entry_filter: DelayFilter,
        exit_condition: X,
        exit_filter: DelayFilter,
        machine: WindowStateMachine<S>,
    ) -> Self {
        Self {
            entry_condition,
            exit_condition,
            entry_filter,
            exit_filter,
            machine,
            order: OrderGuard::new(),
            stats: ScanStats::default(),
        }
    }

    /// Register an accumulator on the underlying machine
    pub fn load<A: Accumulator<S> + 'static>(&mut self, accumulator: A) -> ConfigResult<()> {
        self.machine.load(accumulator)
    }

    /// Process one sample
    pub fn push(&mut self, sample: &Sample<S>) -> ScanResult<Option<WindowResult>> {
        if let Err(err) = self.order.accept(sample.timestamp) {
            self.stats.rejected += 1;
            return Err(err);
        }
        self.stats.samples += 1;

        let entry = self.entry_filter.calc((self.entry_condition)(&sample.data));
        let exit = self.exit_filter.calc((self.exit_condition)(&sample.data));
        self.stats.entry_steps += u64::from(entry);
        self.stats.exit_steps += u64::from(exit);

        let closed = self.machine.run_with(entry, exit, sample.timestamp, &sample.data);
        if closed.is_some() {
            self.stats.windows += 1;
        }
        Ok(closed)
    }

    /// Process samples in order, appending every closed window to `windows`
    ///
    /// Stops at the first rejected sample. Windows closed before it are
    /// already in `windows`.
    pub fn scan_into<'a, I>(&mut self, samples: I, windows: &mut Vec<WindowResult>) -> ScanResult<()>
    where
        I: IntoIterator<Item = &'a Sample<S>>,
        S: 'a,
    {
        for sample in samples {
            if let Some(window) = self.push(sample)? {
                windows.push(window);
            }
        }
        Ok(())
    }

    /// Process samples in order, collecting every closed window
    ///
    /// On a rejected sample the windows closed so far come back with the
    /// error.
    pub fn scan<'a, I>(&mut self, samples: I) -> Result<Vec<WindowResult>, ScanInterrupted>
    where
        I: IntoIterator<Item = &'a Sample<S>>,
        S: 'a,
    {
        let mut windows = Vec::new();
        match self.scan_into(samples, &mut windows) {
            Ok(()) => Ok(windows),
            Err(error) => Err(ScanInterrupted { windows, error }),
        }
    }

    /// Pull samples from `stream` until it ends or has nothing ready,
    /// appending every closed window to `windows`
    ///
    /// Malformed records (`StreamError::Format`) are skipped and counted in
    /// [`ScanStats::malformed`]. A transport failure or a rejected sample
    /// stops the drain; windows closed before it are already in `windows`.
    /// Call again after `WouldBlock` to continue. A window left open at end
    /// of stream is not emitted.
    pub fn drain_into<St, T>(&mut self, stream: &mut St, windows: &mut Vec<WindowResult>) -> ScanResult<()>
    where
        St: Stream<Item = Sample<S>, Error = StreamError<T>>,
        T: fmt::Debug,
    {
        loop {
            match stream.poll_next() {
                Ok(sample) => {
                    if let Some(window) = self.push(&sample)? {
                        windows.push(window);
                    }
                }
                Err(nb::Error::WouldBlock) => return Ok(()),
                Err(nb::Error::Other(StreamError::EndOfStream)) => return Ok(()),
                Err(nb::Error::Other(StreamError::Format(_))) => {
                    self.stats.malformed += 1;
                    log_warn!("Skipped malformed record ({} so far)", self.stats.malformed);
                }
                Err(nb::Error::Other(err)) => {
                    log_warn!("Sample source failed: {:?}", err);
                    return Err(ScanError::Source { reason: err.reason() });
                }
            }
        }
    }

    /// Pull samples from `stream` until it ends or has nothing ready
    ///
    /// Same rules as [`drain_into`](Self::drain_into); on failure the windows
    /// closed so far come back with the error.
    pub fn drain<St, T>(&mut self, stream: &mut St) -> Result<Vec<WindowResult>, ScanInterrupted>
    where
        St: Stream<Item = Sample<S>, Error = StreamError<T>>,
        T: fmt::Debug,
    {
        let mut windows = Vec::new();
        match self.drain_into(stream, &mut windows) {
            Ok(()) => Ok(windows),
            Err(error) => Err(ScanInterrupted { windows, error }),
        }
    }

    /// Lifetime counters
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Underlying state machine
    pub fn machine(&self) -> &WindowStateMachine<S> {
        &self.machine
    }

    /// Entry delay filter
    pub fn entry_filter(&self) -> &DelayFilter {
        &self.entry_filter
    }

    /// Exit delay filter
    pub fn exit_filter(&self) -> &DelayFilter {
        &self.exit_filter
    }

    /// Start over as if freshly built; accumulators stay registered
    pub fn reset(&mut self) {
        self.entry_filter.reset();
        self.exit_filter.reset();
        self.machine.reset();
        self.order.reset();
        self.stats = ScanStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulators::{Counter, Maximum};
    use crate::errors::ConfigError;
    #[cfg(feature = "stream-memory")]
    use crate::stream::MemoryStream;
    use alloc::vec;

    /// Yields scripted poll results, then ends
    struct Scripted {
        script: Vec<Result<Sample<f64>, StreamError<&'static str>>>,
    }

    impl Stream for Scripted {
        type Item = Sample<f64>;
        type Error = StreamError<&'static str>;

        fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
            if self.script.is_empty() {
                return Err(nb::Error::Other(StreamError::EndOfStream));
            }
            self.script.remove(0).map_err(nb::Error::Other)
        }
    }

    fn threshold_scanner() -> SlotScanner<f64, impl Fn(&f64) -> bool, impl Fn(&f64) -> bool> {
        let mut scanner =
            SlotScanner::new(&ScanConfig::default(), |v: &f64| *v > 10.0, |v: &f64| *v < 5.0).unwrap();
        scanner.load(Counter::new()).unwrap();
        scanner
    }

    fn ramp(values: &[f64]) -> Vec<Sample<f64>> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(i as f64 * 0.02, v))
            .collect()
    }

    #[test]
    fn debounced_entry_delays_window_start() {
        let config = ScanConfig::default().with_entry_delay(0.04);
        let mut scanner = SlotScanner::new(&config, |v: &f64| *v > 10.0, |v: &f64| *v < 5.0).unwrap();
        scanner.load(Counter::new()).unwrap();

        let samples = ramp(&[0.0, 12.0, 12.0, 12.0, 12.0, 12.0, 1.0]);
        let windows = scanner.scan(&samples).unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].window_start, 0.06);
        assert_eq!(windows[0].window_end, 0.12);
        assert_eq!(windows[0].outputs.as_slice(), &[2.0]);
    }

    #[test]
    fn turn_off_delay_holds_exit() {
        let config = ScanConfig::default().with_exit_delay(0.06);
        let mut scanner = SlotScanner::new(&config, |v: &f64| *v > 10.0, |v: &f64| *v < 5.0).unwrap();
        scanner.load(Maximum::new(|v: &f64| *v)).unwrap();

        // Exit fires at sample 2 and stays asserted through sample 5, so the
        // window opened at sample 4 closes on the very next sample
        let samples = ramp(&[20.0, 8.0, 1.0, 8.0, 30.0, 8.0]);
        let windows = scanner.scan(&samples).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].window_end, 0.04);
        assert_eq!(windows[0].outputs.as_slice(), &[8.0]);
        assert_eq!(windows[1].window_start, 0.08);
        assert_eq!(windows[1].window_end, 0.1);
        assert!(windows[1].outputs[0].is_nan());
    }

    #[test]
    fn out_of_order_fails_fast() {
        let mut scanner =
            SlotScanner::new(&ScanConfig::default(), |v: &f64| *v > 0.0, |_: &f64| false).unwrap();

        let mut samples = ramp(&[1.0, 1.0, 1.0]);
        samples[2].timestamp = 0.01;

        let interrupted = scanner.scan(&samples).unwrap_err();
        assert_eq!(interrupted.error, ScanError::OutOfOrder { previous: 0.02, current: 0.01 });
        assert!(interrupted.windows.is_empty());
        assert_eq!(scanner.stats().samples, 2);
        assert_eq!(scanner.stats().rejected, 1);

        // Rejected sample left no trace; the stream can continue
        assert!(scanner.push(&Sample::new(0.04, 1.0)).is_ok());
        assert_eq!(scanner.stats().samples, 3);
    }

    #[test]
    fn non_finite_timestamp_rejected() {
        let mut scanner =
            SlotScanner::new(&ScanConfig::default(), |_: &f64| true, |_: &f64| false).unwrap();
        assert_eq!(
            scanner.push(&Sample::new(f64::NAN, 0.0)),
            Err(ScanError::InvalidTimestamp)
        );
        assert!(!scanner.machine().is_active());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ScanConfig::default().with_sample_interval(0.0);
        let result = SlotScanner::new(&config, |_: &()| true, |_: &()| false);
        assert!(matches!(result, Err(ConfigError::InvalidSampleInterval { .. })));
    }

    #[test]
    fn stats_and_reset() {
        let mut scanner =
            SlotScanner::new(&ScanConfig::default(), |v: &f64| *v > 10.0, |v: &f64| *v < 5.0).unwrap();
        scanner.load(Counter::new()).unwrap();

        let samples = ramp(&[20.0, 8.0, 1.0, 20.0]);
        scanner.scan(&samples).unwrap();

        assert_eq!(
            *scanner.stats(),
            ScanStats { samples: 4, rejected: 0, entry_steps: 2, exit_steps: 1, windows: 1, malformed: 0 }
        );
        assert!(scanner.machine().is_active());

        scanner.reset();
        assert_eq!(*scanner.stats(), ScanStats::default());
        assert!(!scanner.machine().is_active());
        // Ordering history cleared too
        assert!(scanner.push(&Sample::new(0.0, 0.0)).is_ok());
    }

    #[test]
    fn scan_keeps_windows_closed_before_rejection() {
        let mut scanner = threshold_scanner();
        // Window closes on sample 2, sample 3 goes back in time
        let mut samples = ramp(&[20.0, 8.0, 1.0, 8.0]);
        samples[3].timestamp = 0.0;

        let interrupted = scanner.scan(&samples).unwrap_err();
        assert_eq!(interrupted.error, ScanError::OutOfOrder { previous: 0.04, current: 0.0 });
        assert_eq!(interrupted.windows.len(), 1);
        assert_eq!(interrupted.windows[0].window_start, 0.0);
        assert_eq!(interrupted.windows[0].window_end, 0.04);
        assert_eq!(interrupted.windows[0].outputs.as_slice(), &[1.0]);
        assert_eq!(scanner.stats().windows, 1);
        assert_eq!(scanner.machine().windows_closed(), 1);
    }

    #[test]
    fn scan_into_appends_before_failing() {
        let mut scanner = threshold_scanner();
        let mut samples = ramp(&[20.0, 8.0, 1.0, 8.0]);
        samples[3].timestamp = f64::INFINITY;

        let mut windows = Vec::new();
        assert_eq!(scanner.scan_into(&samples, &mut windows), Err(ScanError::InvalidTimestamp));
        assert_eq!(windows.len(), 1);

        // Continuing after the rejected sample keeps appending
        let more = ramp(&[20.0, 20.0, 1.0]);
        let more: Vec<_> = more.into_iter().map(|s| Sample::new(s.timestamp + 0.1, s.data)).collect();
        scanner.scan_into(&more, &mut windows).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].outputs.as_slice(), &[1.0]);
    }

    #[test]
    #[cfg(feature = "stream-memory")]
    fn drain_keeps_windows_closed_before_rejection() {
        let mut scanner = threshold_scanner();
        let mut samples = ramp(&[20.0, 8.0, 1.0, 8.0]);
        samples[3].timestamp = 0.0;
        let mut stream = MemoryStream::new(&samples);

        let interrupted = scanner.drain(&mut stream).unwrap_err();
        assert!(matches!(interrupted.error, ScanError::OutOfOrder { .. }));
        assert_eq!(interrupted.windows.len(), 1);
        assert_eq!(interrupted.windows[0].window_end, 0.04);

        // Stream is exhausted; nothing closed twice
        assert!(scanner.drain(&mut stream).unwrap().is_empty());
        assert_eq!(scanner.stats().windows, 1);
    }

    #[test]
    fn drain_skips_malformed_records() {
        let mut scanner = threshold_scanner();
        let mut stream = Scripted {
            script: vec![
                Ok(Sample::new(0.0, 20.0)),
                Err(StreamError::Format("invalid signal value")),
                Ok(Sample::new(0.04, 8.0)),
                Err(StreamError::Format("column count mismatch")),
                Ok(Sample::new(0.08, 1.0)),
            ],
        };

        let windows = scanner.drain(&mut stream).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].window_end, 0.08);
        assert_eq!(windows[0].outputs.as_slice(), &[1.0]);
        assert_eq!(scanner.stats().malformed, 2);
        assert_eq!(scanner.stats().samples, 3);
    }

    #[test]
    fn drain_transport_failure_keeps_closed_windows() {
        let mut scanner = threshold_scanner();
        let mut stream = Scripted {
            script: vec![
                Ok(Sample::new(0.0, 20.0)),
                Ok(Sample::new(0.02, 1.0)),
                Err(StreamError::Transport("link down")),
                Ok(Sample::new(0.04, 20.0)),
            ],
        };

        let interrupted = scanner.drain(&mut stream).unwrap_err();
        assert_eq!(interrupted.error, ScanError::Source { reason: "transport error" });
        assert_eq!(interrupted.windows.len(), 1);
        assert_eq!(interrupted.windows[0].outputs.as_slice(), &[0.0]);

        // The source recovered; draining resumes
        assert!(scanner.drain(&mut stream).unwrap().is_empty());
        assert!(scanner.machine().is_active());
    }

    #[test]
    fn duplicate_timestamps_advance_delay_timers() {
        let config = ScanConfig::default().with_entry_delay(0.04);
        let mut scanner = SlotScanner::new(&config, |v: &f64| *v > 10.0, |v: &f64| *v < 5.0).unwrap();
        scanner.load(Counter::new()).unwrap();

        // Three samples stamped 0.0 satisfy a 0.04 s delay with no time elapsed
        let samples = [
            Sample::new(0.0, 20.0),
            Sample::new(0.0, 20.0),
            Sample::new(0.0, 20.0),
            Sample::new(0.02, 1.0),
        ];
        let windows = scanner.scan(&samples).unwrap();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].window_start, 0.0);
        assert_eq!(windows[0].window_end, 0.02);
        assert_eq!(scanner.stats().rejected, 0);
    }
}
