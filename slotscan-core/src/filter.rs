//! Turn-on / turn-off delay filters
//!
//! Raw conditions computed from measurement signals chatter: an engine speed
//! hovering around its threshold flips `speed > 3680` on and off every few
//! samples. A delay filter only lets a change through once it has persisted
//! for a configured duration.
//!
//! ## Variants
//!
//! ```text
//! Turn-on  (delay = 2 ticks)      Turn-off (delay = 1 tick)
//! input   F T T T T F T           input   T F F F T F
//! output  F F F T T F F           output  T T F F T T
//! ```
//!
//! - **Turn-on**: output goes `true` once the input has been `true` for the
//!   delay. Any `false` input drops the output and restarts the timer.
//! - **Turn-off**: output goes `true` immediately on a `true` input and only
//!   drops after the input has been `false` for the delay.
//!
//! A delay of zero makes both variants pass-through.
//!
//! ## Timer
//!
//! The timer counts samples, not wall time: each step where the input holds
//! its non-reset value adds one tick of `sample_interval_s`. Elapsed time is
//! `ticks * sample_interval_s`, compared against the delay before the tick is
//! added, so a 0.04s delay at 0.02s raster latches on the third consecutive
//! sample. Once the delay is reached the timer stops counting.
//!
//! The raster is an assumption about the stream, not something measured from
//! timestamps; feed these filters resampled data.

use crate::{
    config::FilterConfig,
    constants::TIMER_TOLERANCE,
    errors::ConfigResult,
};

/// Which input value the filter delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DelayKind {
    /// Delay rising edges
    TurnOn,
    /// Delay falling edges
    TurnOff,
}

impl DelayKind {
    /// Input value whose persistence is timed
    ///
    /// The opposite value resets the timer and passes straight through.
    pub const fn held_input(self) -> bool {
        match self {
            DelayKind::TurnOn => true,
            DelayKind::TurnOff => false,
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            DelayKind::TurnOn => "turn-on",
            DelayKind::TurnOff => "turn-off",
        }
    }
}

/// Explicit filter state, advanced by [`DelayState::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayState {
    /// Consecutive samples the held input has been seen, capped at the delay
    pub ticks: u64,
    /// Output of the previous step
    pub output: bool,
}

impl DelayState {
    /// State right after construction: timer cleared, output `false`
    pub const fn initial() -> Self {
        Self { ticks: 0, output: false }
    }

    /// Accumulated duration in seconds
    pub fn elapsed(&self, config: &FilterConfig) -> f64 {
        self.ticks as f64 * config.sample_interval_s
    }

    fn delay_reached(&self, config: &FilterConfig) -> bool {
        self.elapsed(config) + TIMER_TOLERANCE * config.sample_interval_s >= config.delay_s
    }

    /// Advance one sample
    ///
    /// Pure: returns the next state and the filter output for this sample.
    pub fn step(self, kind: DelayKind, config: &FilterConfig, input: bool) -> (Self, bool) {
        let held = kind.held_input();

        if input != held {
            return (Self { ticks: 0, output: input }, input);
        }

        if self.delay_reached(config) {
            (Self { ticks: self.ticks, output: held }, held)
        } else {
            let next = Self {
                ticks: self.ticks.saturating_add(1),
                output: self.output,
            };
            (next, self.output)
        }
    }
}

/// Stateful delay filter
///
/// ```rust
/// use slotscan_core::DelayFilter;
///
/// let mut filter = DelayFilter::turn_on(0.04, 0.02)?;
/// let out: Vec<bool> = [false, true, true, true].iter().map(|&c| filter.calc(c)).collect();
/// assert_eq!(out, [false, false, false, true]);
/// # Ok::<(), slotscan_core::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DelayFilter {
    kind: DelayKind,
    config: FilterConfig,
    state: DelayState,
}

impl DelayFilter {
    /// Create a filter, rejecting a non-positive interval or negative delay
    pub fn new(kind: DelayKind, config: FilterConfig) -> ConfigResult<Self> {
        config.validate()?;

        Ok(Self {
            kind,
            config,
            state: DelayState::initial(),
        })
    }

    /// Turn-on delay of `delay_s` seconds at `sample_interval_s` raster
    pub fn turn_on(delay_s: f64, sample_interval_s: f64) -> ConfigResult<Self> {
        Self::new(DelayKind::TurnOn, FilterConfig { delay_s, sample_interval_s })
    }

    /// Turn-off delay of `delay_s` seconds at `sample_interval_s` raster
    pub fn turn_off(delay_s: f64, sample_interval_s: f64) -> ConfigResult<Self> {
        Self::new(DelayKind::TurnOff, FilterConfig { delay_s, sample_interval_s })
    }

    /// Filter one sample's condition
    pub fn calc(&mut self, input: bool) -> bool {
        let (next, output) = self.state.step(self.kind, &self.config, input);
        self.state = next;
        output
    }

    /// Output of the last `calc`
    pub fn output(&self) -> bool {
        self.state.output
    }

    /// Current state record
    pub fn state(&self) -> DelayState {
        self.state
    }

    /// Filter variant
    pub fn kind(&self) -> DelayKind {
        self.kind
    }

    /// Delay and raster
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Back to the freshly constructed state
    pub fn reset(&mut self) {
        self.state = DelayState::initial();
    }
}
