//! Resampled signal tables from CSV
//!
//! ## Format
//!
//! ```csv
//! time,Epm_nEng,rl_w_msg
//! 0.00,3650.0,80.1
//! 0.02,3690.5,80.4
//! ```
//!
//! The first column is the timestamp in seconds; every other column is one
//! signal, named by the header. Each row becomes a
//! `Sample<Vec<f64>>` whose data holds the signal values in header order.
//! Blank lines are skipped.
//!
//! A malformed row yields `StreamError::Format` and is counted in the stats;
//! the stream stays usable and the next poll continues with the following
//! line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::scan::Sample;
use super::{Stream, StreamError};

/// Statistics for CSV streaming
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CsvStreamStats {
    /// Rows turned into samples
    pub rows_read: usize,
    /// Lines consumed after the header, including blank and bad ones
    pub lines_processed: usize,
    /// Rows rejected as malformed
    pub parse_errors: usize,
}

/// CSV-backed sample stream
///
/// ```rust,no_run
/// use slotscan_core::stream::CsvStream;
///
/// let stream = CsvStream::open("engine_run.csv")?;
/// let speed = stream.column("Epm_nEng").expect("signal present");
/// # Ok::<(), slotscan_core::stream::StreamError<std::io::Error>>(())
/// ```
pub struct CsvStream<R> {
    reader: R,
    signals: Vec<String>,
    line: String,
    eof: bool,
    stats: CsvStreamStats,
}

impl CsvStream<BufReader<File>> {
    /// Open a CSV file and read its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StreamError<io::Error>> {
        let file = File::open(path).map_err(StreamError::Transport)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: BufRead> CsvStream<R> {
    /// Wrap a reader positioned at the header line
    pub fn from_reader(mut reader: R) -> Result<Self, StreamError<io::Error>> {
        let mut header = String::new();
        let read = reader.read_line(&mut header).map_err(StreamError::Transport)?;
        if read == 0 {
            return Err(StreamError::Format("missing header"));
        }

        let mut columns = header.trim().split(',').map(str::trim);
        // First column is time, whatever it is called
        columns.next();
        let signals: Vec<String> = columns.map(String::from).collect();
        if signals.is_empty() {
            return Err(StreamError::Format("no signal columns"));
        }

        Ok(Self {
            reader,
            signals,
            line: String::new(),
            eof: false,
            stats: CsvStreamStats::default(),
        })
    }

    /// Signal names in column order
    pub fn signals(&self) -> &[String] {
        &self.signals
    }

    /// Index of `name` within each sample's data
    pub fn column(&self, name: &str) -> Option<usize> {
        self.signals.iter().position(|signal| signal == name)
    }

    /// Get statistics
    pub fn stats(&self) -> &CsvStreamStats {
        &self.stats
    }

    fn parse_line(&self) -> Result<Sample<Vec<f64>>, StreamError<io::Error>> {
        let mut fields = self.line.trim().split(',').map(str::trim);

        let timestamp = fields
            .next()
            .and_then(|field| field.parse::<f64>().ok())
            .ok_or(StreamError::Format("invalid timestamp"))?;

        let values = fields
            .map(|field| field.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| StreamError::Format("invalid signal value"))?;

        if values.len() != self.signals.len() {
            return Err(StreamError::Format("column count mismatch"));
        }

        Ok(Sample::new(timestamp, values))
    }
}

impl<R: BufRead> Stream for CsvStream<R> {
    type Item = Sample<Vec<f64>>;
    type Error = StreamError<io::Error>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        loop {
            if self.eof {
                return Err(nb::Error::Other(StreamError::EndOfStream));
            }

            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .map_err(|e| nb::Error::Other(StreamError::Transport(e)))?;

            if read == 0 {
                self.eof = true;
                continue;
            }

            self.stats.lines_processed += 1;
            if self.line.trim().is_empty() {
                continue;
            }

            return match self.parse_line() {
                Ok(sample) => {
                    self.stats.rows_read += 1;
                    Ok(sample)
                }
                Err(err) => {
                    self.stats.parse_errors += 1;
                    log_warn!(
                        "CSV line {}: {}",
                        self.stats.lines_processed + 1,
                        err.reason()
                    );
                    Err(nb::Error::Other(err))
                }
            };
        }
    }
}
