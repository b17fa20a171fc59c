//! Loaded recording: an ordered, immutable table of samples.
//!
//! # Accepted Schemas
//!
//! Column names are matched case-insensitively. The timestamp comes from the
//! first of these that is present:
//!
//! 1. `date` + `time`, joined with a space
//! 2. `ts`
//! 3. `timestamp`
//!
//! `axis1`, `axis2`, `axis3` and `vm` are required; `vector.magnitude` is
//! accepted in place of `vm`. Any other columns are ignored.
//!
//! # Ordering
//!
//! Rows are stable-sorted by timestamp if the file is not already in order.
//! When two rows share a timestamp the later row in file order wins and the
//! earlier one is dropped.

use crate::data::csv::{CsvDocument, CsvRow};
use crate::error::{LabelError, Result, ResultExt};
use crate::types::Sample;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::path::Path;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Where the timestamp of a row comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimestampSource {
    DateAndTime { date: usize, time: usize },
    Single(usize),
}

/// Resolved column positions for a header
#[derive(Debug, Clone, Copy)]
struct Columns {
    timestamp: TimestampSource,
    axis1: usize,
    axis2: usize,
    axis3: usize,
    vm: usize,
}

impl Columns {
    fn resolve(header: &[String]) -> Result<Self> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let timestamp = match (find("date"), find("time"), find("ts"), find("timestamp")) {
            (Some(date), Some(time), _, _) => TimestampSource::DateAndTime { date, time },
            (_, _, Some(ts), _) => TimestampSource::Single(ts),
            (_, _, None, Some(ts)) => TimestampSource::Single(ts),
            _ => {
                return Err(LabelError::Schema(
                    "no timestamp source: expected 'date'+'time', 'ts' or 'timestamp'".to_string(),
                ))
            }
        };

        let vm = find("vm").or_else(|| find("vector.magnitude")).ok_or_else(|| {
            LabelError::Schema("missing 'vm' (or 'vector.magnitude') column".to_string())
        })?;

        let require = |name: &str| {
            find(name).ok_or_else(|| LabelError::Schema(format!("missing '{}' column", name)))
        };

        Ok(Self {
            timestamp,
            axis1: require("axis1")?,
            axis2: require("axis2")?,
            axis3: require("axis3")?,
            vm,
        })
    }

    fn sample(&self, row: &CsvRow) -> Result<Sample> {
        let timestamp = match self.timestamp {
            TimestampSource::DateAndTime { date, time } => {
                let joined = format!("{} {}", row.field(date, "date")?, row.field(time, "time")?);
                parse_timestamp(&joined)
            }
            TimestampSource::Single(ts) => parse_timestamp(row.field(ts, "timestamp")?),
        }
        .ok_or_else(|| LabelError::Parse {
            line: row.line,
            message: "unrecognized timestamp".to_string(),
        })?;

        Ok(Sample {
            timestamp,
            axis1: number(row, self.axis1, "axis1")?,
            axis2: number(row, self.axis2, "axis2")?,
            axis3: number(row, self.axis3, "axis3")?,
            vm: number(row, self.vm, "vm")?,
        })
    }
}

fn number(row: &CsvRow, index: usize, column: &str) -> Result<f64> {
    let text = row.field(index, column)?;
    text.parse::<f64>().map_err(|_| LabelError::Parse {
        line: row.line,
        message: format!("invalid number '{}' in column '{}'", text, column),
    })
}

/// Parse a timestamp in any of the accepted text forms
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// An immutable recording, sorted by timestamp with unique timestamps
#[derive(Debug, Clone)]
pub struct SampleTable {
    samples: Vec<Sample>,
    source_name: String,
    resorted: bool,
    dropped_duplicates: usize,
}

impl SampleTable {
    /// Build a table from already-parsed samples
    pub fn from_samples(samples: Vec<Sample>, source_name: impl Into<String>) -> Result<Self> {
        if samples.is_empty() {
            return Err(LabelError::Schema("recording has no samples".to_string()));
        }

        let mut samples = samples;
        let resorted = !samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp);
        if resorted {
            samples.sort_by_key(|s| s.timestamp);
        }

        let total = samples.len();
        let mut unique: Vec<Sample> = Vec::with_capacity(total);
        for sample in samples {
            match unique.last_mut() {
                Some(last) if last.timestamp == sample.timestamp => *last = sample,
                _ => unique.push(sample),
            }
        }

        Ok(Self {
            dropped_duplicates: total - unique.len(),
            samples: unique,
            source_name: source_name.into(),
            resorted,
        })
    }

    /// Build a table from a parsed CSV document
    pub fn load(doc: &CsvDocument, source_name: impl Into<String>) -> Result<Self> {
        let columns = Columns::resolve(&doc.header)?;
        let samples = doc
            .rows
            .iter()
            .map(|row| columns.sample(row))
            .collect::<Result<Vec<_>>>()?;
        Self::from_samples(samples, source_name)
    }

    /// Parse CSV text into a table
    pub fn parse(text: &str, source_name: impl Into<String>) -> Result<Self> {
        Self::load(&CsvDocument::parse(text)?, source_name)
    }

    /// Read and parse a recording file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let table = Self::parse(&text, source_name)
            .with_context(|| format!("Failed to load {}", path.display()))?;

        if table.dropped_duplicates > 0 {
            tracing::warn!(
                "{}: dropped {} rows with duplicate timestamps",
                table.source_name,
                table.dropped_duplicates
            );
        }
        if table.resorted {
            tracing::debug!("{}: rows were out of order and have been sorted", table.source_name);
        }
        Ok(table)
    }

    /// All samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed table
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Original file name, used as the default export name
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Whether the input had to be sorted
    pub fn was_resorted(&self) -> bool {
        self.resorted
    }

    /// Number of input rows dropped as duplicate timestamps
    pub fn dropped_duplicates(&self) -> usize {
        self.dropped_duplicates
    }

    /// First and last timestamp
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.samples[0].timestamp, self.samples[self.samples.len() - 1].timestamp)
    }

    /// Min and max of the vm signal
    pub fn vm_range(&self) -> (f64, f64) {
        self.samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.vm), hi.max(s.vm))
            })
    }

    /// Position of the sample at exactly `t`
    pub fn position_of(&self, t: NaiveDateTime) -> Option<usize> {
        self.samples.binary_search_by_key(&t, |s| s.timestamp).ok()
    }

    /// Position of the sample closest to `t`.
    ///
    /// An exact midpoint between two samples resolves to the earlier one.
    /// Times outside the recording resolve to the nearest end.
    pub fn nearest_index(&self, t: NaiveDateTime) -> usize {
        let next = self.samples.partition_point(|s| s.timestamp < t);
        if next == 0 {
            return 0;
        }
        if next == self.samples.len() {
            return next - 1;
        }
        let after = self.samples[next].timestamp;
        if after == t {
            return next;
        }
        let before = self.samples[next - 1].timestamp;
        if t - before <= after - t {
            next - 1
        } else {
            next
        }
    }
}
