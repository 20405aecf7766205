//! Shared fixtures for integration tests
//!
//! Synthetic engine-run generators on the 50 Hz raster, shaped like the
//! resampled measurement data the scanner is meant for.

#![allow(dead_code)]

use slotscan_core::Sample;

/// Raster used by every fixture
pub const DT: f64 = 0.02;

/// One resampled measurement row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineFrame {
    /// Engine speed, rpm
    pub speed: f64,
    /// Relative load, %
    pub load: f64,
}

/// Entry: high speed under high load
pub fn entry(frame: &EngineFrame) -> bool {
    frame.speed > 3680.0 && frame.load > 75.0
}

/// Exit: speed fell away
pub fn exit(frame: &EngineFrame) -> bool {
    frame.speed < 3400.0
}

/// Piecewise-constant engine run
///
/// Each segment is `(samples, speed, load)`; timestamps start at zero on the
/// `DT` raster.
pub fn engine_run(segments: &[(usize, f64, f64)]) -> Vec<Sample<EngineFrame>> {
    let mut samples = Vec::new();
    for &(count, speed, load) in segments {
        for _ in 0..count {
            let timestamp = samples.len() as f64 * DT;
            samples.push(Sample::new(timestamp, EngineFrame { speed, load }));
        }
    }
    samples
}

/// Deterministic xorshift generator for noisy fixtures
pub struct TestRng(u32);

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Speed oscillating around the entry threshold with uniform noise
pub fn noisy_run(samples: usize, base_speed: f64, noise_rpm: f64, seed: u32) -> Vec<Sample<EngineFrame>> {
    let mut rng = TestRng::new(seed);
    (0..samples)
        .map(|i| {
            let speed = base_speed + (rng.next_f64() * 2.0 - 1.0) * noise_rpm;
            Sample::new(i as f64 * DT, EngineFrame { speed, load: 80.0 })
        })
        .collect()
}
