//! Memory-based streams for testing and replay

use crate::scan::Sample;
use super::{Stream, StreamError};

/// Replays a slice of samples
///
/// Replayable: `reset` rewinds to the first sample, so the same recording can
/// be scanned with different configurations.
///
/// ```rust
/// use slotscan_core::{Sample, Stream};
/// use slotscan_core::stream::MemoryStream;
///
/// let samples = [Sample::new(0.0, 1.0), Sample::new(0.02, 2.0)];
/// let mut stream = MemoryStream::new(&samples);
/// assert_eq!(stream.size_hint(), (2, Some(2)));
///
/// while let Ok(sample) = stream.poll_next() {
///     assert!(sample.data > 0.0);
/// }
/// assert!(stream.is_exhausted());
/// ```
pub struct MemoryStream<'a, S> {
    samples: &'a [Sample<S>],
    position: usize,
}

impl<'a, S> MemoryStream<'a, S> {
    /// Create new memory stream from slice
    pub fn new(samples: &'a [Sample<S>]) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Rewind to the first sample
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Index of the next sample
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if stream is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.samples.len()
    }
}

impl<'a, S: Clone> Stream for MemoryStream<'a, S> {
    type Item = Sample<S>;
    type Error = StreamError<()>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        let sample = self
            .samples
            .get(self.position)
            .ok_or(nb::Error::Other(StreamError::EndOfStream))?;

        self.position += 1;
        Ok(sample.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}
