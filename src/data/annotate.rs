//! Derivation of per-sample sleep and discard flags from markers.
//!
//! Each flag is computed by its own pass over the markers of its group,
//! sorted by time. Every marker overwrites the flag for all samples from its
//! position to the end of the recording, so for any sample the latest marker
//! at or before it decides the value:
//!
//! | Marker           | Samples affected        | Flag set            |
//! |------------------|-------------------------|---------------------|
//! | `SleepStart`     | `timestamp >= time`     | `sleep = true`      |
//! | `SleepEnd`       | `timestamp >= time`     | `sleep = false`     |
//! | `DiscardBefore`  | `timestamp > time`      | `discard = false`   |
//! | `DiscardAfter`   | `timestamp >= time`     | `discard = true`    |
//!
//! With no markers every sample is awake and discarded. Nothing is kept for
//! analysis unless a `DiscardBefore` marker explicitly opens the range.

use crate::data::markers::MarkerSequence;
use crate::data::table::SampleTable;
use crate::types::{Marker, MarkerKind, Sample};
use std::ops::RangeInclusive;

/// Flags for one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub sleep: bool,
    pub discard: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            sleep: false,
            discard: true,
        }
    }
}

/// Flags for every sample of a table, in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    flags: Vec<Flags>,
}

/// Compute the annotation of `table` under `markers`
pub fn annotate(table: &SampleTable, markers: &MarkerSequence) -> Annotation {
    let samples = table.samples();
    let mut flags = vec![Flags::default(); samples.len()];

    for marker in markers.view_by_time(MarkerKind::is_sleep) {
        let from = first_at_or_after(samples, &marker);
        let asleep = marker.kind == MarkerKind::SleepStart;
        for f in &mut flags[from..] {
            f.sleep = asleep;
        }
    }

    for marker in markers.view_by_time(MarkerKind::is_discard) {
        let (from, discard) = match marker.kind {
            MarkerKind::DiscardBefore => (first_after(samples, &marker), false),
            _ => (first_at_or_after(samples, &marker), true),
        };
        for f in &mut flags[from..] {
            f.discard = discard;
        }
    }

    Annotation { flags }
}

fn first_at_or_after(samples: &[Sample], marker: &Marker) -> usize {
    samples.partition_point(|s| s.timestamp < marker.time)
}

fn first_after(samples: &[Sample], marker: &Marker) -> usize {
    samples.partition_point(|s| s.timestamp <= marker.time)
}

impl Annotation {
    /// All flags in table order
    pub fn flags(&self) -> &[Flags] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn sleep(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags.iter().map(|f| f.sleep)
    }

    pub fn discard(&self) -> impl Iterator<Item = bool> + '_ {
        self.flags.iter().map(|f| f.discard)
    }

    /// Number of samples labeled asleep
    pub fn sleep_count(&self) -> usize {
        self.flags.iter().filter(|f| f.sleep).count()
    }

    /// Number of samples kept for analysis
    pub fn kept_count(&self) -> usize {
        self.flags.iter().filter(|f| !f.discard).count()
    }

    /// Runs of consecutive asleep samples, as inclusive index ranges
    pub fn sleep_spans(&self) -> Vec<RangeInclusive<usize>> {
        self.spans(|f| f.sleep)
    }

    /// Runs of consecutive discarded samples, as inclusive index ranges
    pub fn discard_spans(&self) -> Vec<RangeInclusive<usize>> {
        self.spans(|f| f.discard)
    }

    fn spans(&self, pred: impl Fn(&Flags) -> bool) -> Vec<RangeInclusive<usize>> {
        let mut spans = Vec::new();
        let mut start = None;
        for (i, f) in self.flags.iter().enumerate() {
            match (pred(f), start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    spans.push(s..=i - 1);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push(s..=self.flags.len() - 1);
        }
        spans
    }
}
