//! Example: High-Speed Engine Slots
//!
//! This example demonstrates how to:
//! - Debounce raw entry/exit predicates with turn-on/turn-off delays
//! - Collect several per-window results from one scan
//! - Replay the same recording with a different configuration
//!
//! The engine run is synthetic; a real one would come from a resampled
//! measurement export (see `stream::CsvStream` with the `stream-csv` feature).

use slotscan_core::{
    stream::MemoryStream, Counter, Maximum, Mean, Sample, ScanConfig, ScanError, SlotScanner,
};

#[derive(Debug, Clone, Copy)]
struct Frame {
    engine_speed: f64,
    relative_load: f64,
}

fn synthetic_run() -> Vec<Sample<Frame>> {
    let profile: [(usize, f64, f64); 7] = [
        (500, 2500.0, 40.0),
        (3000, 3700.0, 80.0),
        (250, 3300.0, 30.0),
        (200, 3720.0, 78.0),
        (500, 3500.0, 60.0),
        (4000, 3800.0, 90.0),
        (500, 2800.0, 20.0),
    ];

    let mut samples = Vec::new();
    for (count, speed, load) in profile {
        for i in 0..count {
            // Some ripple so the raw predicates chatter at the edges
            let ripple = if i % 7 == 0 { -40.0 } else { 0.0 };
            let timestamp = samples.len() as f64 * 0.02;
            samples.push(Sample::new(
                timestamp,
                Frame { engine_speed: speed + ripple, relative_load: load },
            ));
        }
    }
    samples
}

fn scan(samples: &[Sample<Frame>], config: &ScanConfig) -> Result<(), ScanError> {
    let mut scanner = SlotScanner::new(
        config,
        |f: &Frame| f.engine_speed > 3680.0 && f.relative_load > 75.0,
        |f: &Frame| f.engine_speed < 3400.0,
    )?;
    scanner.load(Counter::new())?;
    scanner.load(Maximum::new(|f: &Frame| f.engine_speed))?;
    scanner.load(Mean::new(|f: &Frame| f.relative_load))?;

    let mut stream = MemoryStream::new(samples);
    let mut windows = Vec::new();
    let drained = scanner.drain_into(&mut stream, &mut windows);
    for window in &windows {
        println!(
            "Find Slot: [{:8.2}, {:8.2}], samples {:5}, max speed {:6.0}, mean load {:5.1}",
            window.window_start,
            window.window_end,
            window.outputs[0],
            window.outputs[1],
            window.outputs[2],
        );
    }

    let stats = scanner.stats();
    println!(
        "{} samples, {} windows, window open at end: {}",
        stats.samples,
        stats.windows,
        scanner.machine().is_active()
    );

    // Windows printed above stand even if the source failed afterwards
    drained
}

fn main() -> Result<(), ScanError> {
    println!("=== SlotScan Engine Slot Example ===\n");
    let samples = synthetic_run();

    println!("Example 1: no debouncing");
    println!("------------------------");
    scan(&samples, &ScanConfig::default())?;

    println!("\nExample 2: 5s entry delay, 2s exit delay");
    println!("----------------------------------------");
    let config = ScanConfig::default()
        .with_entry_delay(5.0)
        .with_exit_delay(2.0);
    scan(&samples, &config)?;

    Ok(())
}
