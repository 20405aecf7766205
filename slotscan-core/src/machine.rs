//! Window state machine
//!
//! ## States
//!
//! ```text
//!                 entry
//!        ┌──────────────────────┐
//!        │                      ▼
//!    ┌───────┐    exit     ┌────────┐ ──┐ entry && re_entry: restart
//!    │ Idle  │ ◄────────── │ Active │   │ otherwise: update accumulators
//!    └───────┘   (emit)    └────────┘ ◄─┘
//! ```
//!
//! Evaluated once per sample with already-debounced conditions:
//!
//! | Mode   | Condition                      | Effect                                      |
//! |--------|--------------------------------|---------------------------------------------|
//! | Idle   | entry                          | open: start = end = t, reset accumulators   |
//! | Idle   | !entry                         | nothing                                     |
//! | Active | exit                           | close: end = t, emit outputs, go Idle       |
//! | Active | !exit && entry && re_entry     | reopen: start = end = t, reset accumulators |
//! | Active | otherwise                      | update accumulators                         |
//!
//! Exit wins over re-entry in the same sample. `window_end` only moves on
//! open/reopen and on close, so it equals `window_start` for the whole life
//! of an open window and becomes the closing timestamp on the closing sample.
//! Accumulators see exactly the samples strictly between the (last) opening
//! sample and the closing sample.
//!
//! There is no terminal state; a machine runs for the life of its stream.
//!
//! ## Preconditions
//!
//! Samples must be fed in non-decreasing timestamp order. The machine does not
//! check; out-of-order input silently produces wrong windows.
//! [`SlotScanner`](crate::SlotScanner) checks ordering for you.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::{
    constants::MAX_ACCUMULATORS,
    errors::{ConfigError, ConfigResult},
    time::Timestamp,
    traits::Accumulator,
};

/// Whether a window is currently open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Waiting for the entry condition
    #[default]
    Idle,
    /// Inside a window, waiting for the exit condition
    Active,
}

/// What one step did to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle and no entry
    Stay,
    /// Window opened on this sample
    Open,
    /// Open window restarted on this sample
    Reopen,
    /// Sample folded into the open window
    Accumulate,
    /// Window closed on this sample
    Close,
}

/// Explicit machine state, advanced by [`MachineState::step`]
///
/// While idle, the bounds hold the last closed window (or zero if none has
/// opened yet) and carry no meaning until the next entry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineState {
    /// Idle or active
    pub mode: Mode,
    /// Timestamp of the (re)opening sample
    pub window_start: Timestamp,
    /// Equal to `window_start` until the closing sample sets it
    pub window_end: Timestamp,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::initial()
    }
}

impl MachineState {
    /// Idle, never opened
    pub const fn initial() -> Self {
        Self {
            mode: Mode::Idle,
            window_start: 0.0,
            window_end: 0.0,
        }
    }

    /// Advance one sample
    ///
    /// Pure transition function; the caller applies the returned
    /// [`Transition`] to its accumulators.
    pub fn step(self, entry: bool, exit: bool, timestamp: Timestamp, re_entry: bool) -> (Self, Transition) {
        match self.mode {
            Mode::Idle if entry => (Self::opened_at(timestamp), Transition::Open),
            Mode::Idle => (self, Transition::Stay),
            Mode::Active if exit => {
                let closed = Self {
                    mode: Mode::Idle,
                    window_start: self.window_start,
                    window_end: timestamp,
                };
                (closed, Transition::Close)
            }
            Mode::Active if entry && re_entry => (Self::opened_at(timestamp), Transition::Reopen),
            Mode::Active => (self, Transition::Accumulate),
        }
    }

    fn opened_at(timestamp: Timestamp) -> Self {
        Self {
            mode: Mode::Active,
            window_start: timestamp,
            window_end: timestamp,
        }
    }
}

/// Outputs in accumulator registration order
pub type Outputs = heapless::Vec<f64, MAX_ACCUMULATORS>;

/// A closed window
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowResult {
    /// Timestamp of the sample that (last) opened the window
    pub window_start: Timestamp,
    /// Timestamp of the sample that closed the window
    pub window_end: Timestamp,
    /// One value per accumulator, in registration order
    pub outputs: Outputs,
}

impl WindowResult {
    /// Window length in seconds
    pub fn duration(&self) -> f64 {
        self.window_end - self.window_start
    }
}

/// Entry/exit window detector owning a set of accumulators
///
/// ```rust
/// use slotscan_core::{Counter, WindowStateMachine};
///
/// let mut machine = WindowStateMachine::new(true);
/// machine.load(Counter::new())?;
///
/// let entry = [true, false, true, false, true];
/// let exit = [false, false, false, false, true];
/// let mut closed = None;
/// for i in 0..5 {
///     closed = machine.run(entry[i], exit[i], i as f64 * 0.02);
/// }
///
/// // Re-entry at sample 2 restarted the window: only sample 3 was counted
/// let window = closed.unwrap();
/// assert_eq!(window.window_start, 0.04);
/// assert_eq!(window.window_end, 0.08);
/// assert_eq!(window.outputs.as_slice(), &[1.0]);
/// # Ok::<(), slotscan_core::ConfigError>(())
/// ```
pub struct WindowStateMachine<S = ()> {
    re_entry: bool,
    state: MachineState,
    accumulators: Vec<Box<dyn Accumulator<S>>>,
    windows_closed: u64,
}

impl WindowStateMachine {
    /// Machine over unit samples, for accumulators that only count
    pub fn new(re_entry: bool) -> Self {
        Self::with_re_entry(re_entry)
    }

    /// Evaluate one sample
    ///
    /// Returns the window when this sample closes one.
    pub fn run(&mut self, entry: bool, exit: bool, timestamp: Timestamp) -> Option<WindowResult> {
        self.run_with(entry, exit, timestamp, &())
    }
}

impl<S> WindowStateMachine<S> {
    /// Idle machine with no accumulators
    pub fn with_re_entry(re_entry: bool) -> Self {
        Self {
            re_entry,
            state: MachineState::initial(),
            accumulators: Vec::new(),
            windows_closed: 0,
        }
    }

    /// Register an accumulator; outputs follow registration order
    pub fn load<A: Accumulator<S> + 'static>(&mut self, accumulator: A) -> ConfigResult<()> {
        self.load_boxed(Box::new(accumulator))
    }

    /// Register an already boxed accumulator
    pub fn load_boxed(&mut self, accumulator: Box<dyn Accumulator<S>>) -> ConfigResult<()> {
        if self.accumulators.len() >= MAX_ACCUMULATORS {
            return Err(ConfigError::TooManyAccumulators {
                capacity: MAX_ACCUMULATORS,
            });
        }

        self.accumulators.push(accumulator);
        Ok(())
    }

    /// Evaluate one sample, handing `sample` to the accumulators if it falls
    /// inside an open window
    ///
    /// Returns the window when this sample closes one.
    pub fn run_with(&mut self, entry: bool, exit: bool, timestamp: Timestamp, sample: &S) -> Option<WindowResult> {
        let (next, transition) = self.state.step(entry, exit, timestamp, self.re_entry);
        self.state = next;

        match transition {
            Transition::Stay => None,
            Transition::Open | Transition::Reopen => {
                log_debug!("Window {:?} at {}s", transition, timestamp);
                for accumulator in self.accumulators.iter_mut() {
                    accumulator.reset();
                }
                None
            }
            Transition::Accumulate => {
                for accumulator in self.accumulators.iter_mut() {
                    accumulator.update(sample);
                }
                None
            }
            Transition::Close => {
                self.windows_closed += 1;
                log_debug!(
                    "Window closed: [{}, {}]s",
                    self.state.window_start,
                    self.state.window_end
                );
                Some(WindowResult {
                    window_start: self.state.window_start,
                    window_end: self.state.window_end,
                    outputs: self.values(),
                })
            }
        }
    }

    /// Current accumulator values, in registration order
    pub fn values(&self) -> Outputs {
        // load() caps the count at capacity
        self.accumulators.iter().map(|acc| acc.value()).collect()
    }

    /// Current state record
    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Idle or active
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Whether a window is open
    pub fn is_active(&self) -> bool {
        self.state.mode == Mode::Active
    }

    /// Re-entry policy
    pub fn re_entry(&self) -> bool {
        self.re_entry
    }

    /// Number of registered accumulators
    pub fn accumulator_count(&self) -> usize {
        self.accumulators.len()
    }

    /// Accumulator names, in registration order
    pub fn accumulator_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.accumulators.iter().map(|acc| acc.name())
    }

    /// Windows emitted so far
    pub fn windows_closed(&self) -> u64 {
        self.windows_closed
    }

    /// Drop any open window and return to idle; accumulators stay registered
    pub fn reset(&mut self) {
        self.state = MachineState::initial();
        self.windows_closed = 0;
        for accumulator in self.accumulators.iter_mut() {
            accumulator.reset();
        }
    }
}

impl<S> fmt::Debug for WindowStateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowStateMachine")
            .field("re_entry", &self.re_entry)
            .field("state", &self.state)
            .field("accumulators", &self.accumulators.len())
            .field("windows_closed", &self.windows_closed)
            .finish()
    }
}
