//! Sample counter

use crate::traits::Accumulator;

/// Counts in-window samples
///
/// Works with any sample type. For a window opened at sample `s` and closed
/// at sample `e` without re-entry, the count is `e - s - 1`.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    count: u64,
}

impl Counter {
    /// Fresh counter at zero
    pub fn new() -> Self {
        Self { count: 0 }
    }

    /// Count as an integer
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<S: ?Sized> Accumulator<S> for Counter {
    fn reset(&mut self) {
        self.count = 0;
    }

    fn update(&mut self, _sample: &S) {
        self.count += 1;
    }

    fn value(&self) -> f64 {
        self.count as f64
    }

    fn name(&self) -> &str {
        "counter"
    }
}
