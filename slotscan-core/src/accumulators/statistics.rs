//! Signal statistics over a window
//!
//! Each accumulator here pulls one value per sample through an extractor
//! closure. Extrema and mean of a window with no inner samples are NaN.

use crate::traits::Accumulator;

/// Running total of an extracted value
pub struct Sum<F> {
    extract: F,
    total: f64,
}

impl<F> Sum<F> {
    /// Sum whatever `extract` returns for each in-window sample
    pub fn new(extract: F) -> Self {
        Self { extract, total: 0.0 }
    }
}

impl<S, F: Fn(&S) -> f64> Accumulator<S> for Sum<F> {
    fn reset(&mut self) {
        self.total = 0.0;
    }

    fn update(&mut self, sample: &S) {
        self.total += (self.extract)(sample);
    }

    fn value(&self) -> f64 {
        self.total
    }

    fn name(&self) -> &str {
        "sum"
    }
}

/// Smallest extracted value
pub struct Minimum<F> {
    extract: F,
    min: Option<f64>,
}

impl<F> Minimum<F> {
    /// Track the minimum of `extract` over in-window samples
    pub fn new(extract: F) -> Self {
        Self { extract, min: None }
    }
}

impl<S, F: Fn(&S) -> f64> Accumulator<S> for Minimum<F> {
    fn reset(&mut self) {
        self.min = None;
    }

    fn update(&mut self, sample: &S) {
        let value = (self.extract)(sample);
        self.min = Some(match self.min {
            Some(min) if min <= value => min,
            _ => value,
        });
    }

    fn value(&self) -> f64 {
        self.min.unwrap_or(f64::NAN)
    }

    fn name(&self) -> &str {
        "min"
    }
}

/// Largest extracted value
pub struct Maximum<F> {
    extract: F,
    max: Option<f64>,
}

impl<F> Maximum<F> {
    /// Track the maximum of `extract` over in-window samples
    pub fn new(extract: F) -> Self {
        Self { extract, max: None }
    }
}

impl<S, F: Fn(&S) -> f64> Accumulator<S> for Maximum<F> {
    fn reset(&mut self) {
        self.max = None;
    }

    fn update(&mut self, sample: &S) {
        let value = (self.extract)(sample);
        self.max = Some(match self.max {
            Some(max) if max >= value => max,
            _ => value,
        });
    }

    fn value(&self) -> f64 {
        self.max.unwrap_or(f64::NAN)
    }

    fn name(&self) -> &str {
        "max"
    }
}

/// Arithmetic mean of an extracted value
pub struct Mean<F> {
    extract: F,
    total: f64,
    count: u64,
}

impl<F> Mean<F> {
    /// Average `extract` over in-window samples
    pub fn new(extract: F) -> Self {
        Self { extract, total: 0.0, count: 0 }
    }
}

impl<S, F: Fn(&S) -> f64> Accumulator<S> for Mean<F> {
    fn reset(&mut self) {
        self.total = 0.0;
        self.count = 0;
    }

    fn update(&mut self, sample: &S) {
        self.total += (self.extract)(sample);
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.total / self.count as f64
    }

    fn name(&self) -> &str {
        "mean"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<A: Accumulator<f64>>(acc: &mut A, values: &[f64]) -> f64 {
        acc.reset();
        for value in values {
            acc.update(value);
        }
        acc.value()
    }

    #[test]
    fn sum_of_values() {
        let mut sum = Sum::new(|v: &f64| *v);
        assert_eq!(feed(&mut sum, &[1.0, 2.5, -0.5]), 3.0);
        assert_eq!(feed(&mut sum, &[]), 0.0);
    }

    #[test]
    fn extrema() {
        let mut min = Minimum::new(|v: &f64| *v);
        let mut max = Maximum::new(|v: &f64| *v);

        assert_eq!(feed(&mut min, &[3.0, -1.0, 2.0]), -1.0);
        assert_eq!(feed(&mut max, &[3.0, -1.0, 2.0]), 3.0);
    }

    #[test]
    fn empty_window_is_nan() {
        let mut min = Minimum::new(|v: &f64| *v);
        let mut max = Maximum::new(|v: &f64| *v);
        let mut mean = Mean::new(|v: &f64| *v);

        assert!(feed(&mut min, &[]).is_nan());
        assert!(feed(&mut max, &[]).is_nan());
        assert!(feed(&mut mean, &[]).is_nan());
    }

    #[test]
    fn mean_resets_between_windows() {
        let mut mean = Mean::new(|v: &f64| *v * 2.0);
        assert_eq!(feed(&mut mean, &[1.0, 2.0, 3.0]), 4.0);
        assert_eq!(feed(&mut mean, &[10.0]), 20.0);
    }
}
