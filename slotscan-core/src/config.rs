//! Scan configuration
//!
//! Two layers:
//! - [`FilterConfig`]: one delay filter (threshold + assumed raster)
//! - [`ScanConfig`]: everything a [`SlotScanner`](crate::SlotScanner) needs
//!
//! Both deserialize via serde when the `serde` feature is on:
//!
//! ```json
//! {"re_entry": false, "sample_interval_s": 0.02, "entry_delay_s": 50.0, "exit_delay_s": 20.0}
//! ```
//!
//! Missing fields fall back to the defaults in [`constants`](crate::constants).
//!
//! The sample interval is an assumed constant cadence, never derived from the
//! timestamps themselves. On a non-uniformly sampled stream the filter timers
//! drift away from logical time.

use crate::{
    constants::{DEFAULT_DELAY_S, DEFAULT_SAMPLE_INTERVAL_S},
    errors::{ConfigError, ConfigResult},
};

/// Parameters of a single delay filter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Duration the input must hold before the output latches (seconds)
    pub delay_s: f64,
    /// Assumed spacing between samples (seconds)
    pub sample_interval_s: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            delay_s: DEFAULT_DELAY_S,
            sample_interval_s: DEFAULT_SAMPLE_INTERVAL_S,
        }
    }
}

impl FilterConfig {
    /// Create and validate a filter configuration
    pub fn new(delay_s: f64, sample_interval_s: f64) -> ConfigResult<Self> {
        let config = Self { delay_s, sample_interval_s };
        config.validate()?;
        Ok(config)
    }

    /// Check interval > 0 and delay >= 0
    ///
    /// NaN fails both checks.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.sample_interval_s.is_finite() || self.sample_interval_s <= 0.0 {
            return Err(ConfigError::InvalidSampleInterval {
                interval: self.sample_interval_s,
            });
        }

        if self.delay_s.is_nan() || self.delay_s < 0.0 {
            return Err(ConfigError::InvalidDelay { delay: self.delay_s });
        }

        Ok(())
    }
}

/// Scanner configuration: re-entry policy plus both filter delays
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    /// Restart an open window when the entry condition fires again
    pub re_entry: bool,
    /// Assumed spacing between samples (seconds)
    pub sample_interval_s: f64,
    /// Turn-on delay applied to the entry condition (seconds)
    pub entry_delay_s: f64,
    /// Turn-off delay applied to the exit condition (seconds)
    pub exit_delay_s: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            re_entry: false,
            sample_interval_s: DEFAULT_SAMPLE_INTERVAL_S,
            entry_delay_s: DEFAULT_DELAY_S,
            exit_delay_s: DEFAULT_DELAY_S,
        }
    }
}

impl ScanConfig {
    /// Enable or disable re-entry
    pub fn with_re_entry(mut self, re_entry: bool) -> Self {
        self.re_entry = re_entry;
        self
    }

    /// Set the assumed sample interval
    pub fn with_sample_interval(mut self, interval_s: f64) -> Self {
        self.sample_interval_s = interval_s;
        self
    }

    /// Set the entry turn-on delay
    pub fn with_entry_delay(mut self, delay_s: f64) -> Self {
        self.entry_delay_s = delay_s;
        self
    }

    /// Set the exit turn-off delay
    pub fn with_exit_delay(mut self, delay_s: f64) -> Self {
        self.exit_delay_s = delay_s;
        self
    }

    /// Filter parameters for the entry condition
    pub fn entry_filter(&self) -> FilterConfig {
        FilterConfig {
            delay_s: self.entry_delay_s,
            sample_interval_s: self.sample_interval_s,
        }
    }

    /// Filter parameters for the exit condition
    pub fn exit_filter(&self) -> FilterConfig {
        FilterConfig {
            delay_s: self.exit_delay_s,
            sample_interval_s: self.sample_interval_s,
        }
    }

    /// Validate both filters
    pub fn validate(&self) -> ConfigResult<()> {
        self.entry_filter().validate()?;
        self.exit_filter().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(FilterConfig::default().validate().is_ok());
        assert!(ScanConfig::default().validate().is_ok());
        assert_eq!(ScanConfig::default().sample_interval_s, 0.02);
    }

    #[test]
    fn rejects_bad_interval() {
        for interval in [0.0, -0.02, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                FilterConfig::new(0.0, interval),
                Err(ConfigError::InvalidSampleInterval { .. })
            ));
        }
    }

    #[test]
    fn rejects_bad_delay() {
        assert_eq!(
            FilterConfig::new(-0.5, 0.02),
            Err(ConfigError::InvalidDelay { delay: -0.5 })
        );
        assert!(FilterConfig::new(f64::NAN, 0.02).is_err());
        assert!(FilterConfig::new(0.0, 0.02).is_ok());
    }

    #[test]
    fn scan_config_splits_filters() {
        let config = ScanConfig::default()
            .with_entry_delay(50.0)
            .with_exit_delay(20.0)
            .with_re_entry(true);

        assert_eq!(config.entry_filter(), FilterConfig { delay_s: 50.0, sample_interval_s: 0.02 });
        assert_eq!(config.exit_filter().delay_s, 20.0);
        assert!(config.re_entry);

        let bad = config.with_exit_delay(-1.0);
        assert_eq!(bad.validate(), Err(ConfigError::InvalidDelay { delay: -1.0 }));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn scan_config_from_json() {
        let config: ScanConfig = serde_json::from_str(
            r#"{"re_entry": true, "entry_delay_s": 50.0, "exit_delay_s": 20.0}"#,
        )
        .unwrap();

        assert!(config.re_entry);
        assert_eq!(config.entry_delay_s, 50.0);
        assert_eq!(config.exit_delay_s, 20.0);
        assert_eq!(config.sample_interval_s, 0.02);
        assert!(config.validate().is_ok());
    }
}
