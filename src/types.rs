//! Core data types for the labeling tool
//!
//! This module contains the fundamental data structures shared by the
//! loader, the labeling session and the plot.
//!
//! # Main Types
//!
//! - [`Sample`] - One sensor reading (timestamp, three axes, vector magnitude)
//! - [`MarkerKind`] - The four boundary kinds a user can place
//! - [`Marker`] - A snapped, time-anchored boundary
//!
//! # Time Axis
//!
//! Recordings carry wall-clock time without a zone, so instants are
//! [`chrono::NaiveDateTime`]. The plot works in `f64` seconds since the Unix
//! epoch; [`to_plot_x`] and [`from_plot_x`] convert between the two.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of points to render per line for performance
pub const MAX_RENDER_POINTS: usize = 4000;

/// A single sensor reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub axis1: f64,
    pub axis2: f64,
    pub axis3: f64,
    /// Vector magnitude, the plotted activity signal
    pub vm: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, axis1: f64, axis2: f64, axis3: f64, vm: f64) -> Self {
        Self {
            timestamp,
            axis1,
            axis2,
            axis3,
            vm,
        }
    }

    /// Plot coordinate of this sample as `[x, vm]`
    pub fn plot_point(&self) -> [f64; 2] {
        [to_plot_x(self.timestamp), self.vm]
    }
}

/// Kind of boundary marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Sleep begins at this sample (inclusive)
    SleepStart,
    /// Sleep ends at this sample (the sample itself is awake)
    SleepEnd,
    /// Everything up to and including this sample is discarded
    DiscardBefore,
    /// This sample and everything after is discarded
    DiscardAfter,
}

impl MarkerKind {
    /// Whether this kind drives the sleep flag
    pub fn is_sleep(&self) -> bool {
        matches!(self, MarkerKind::SleepStart | MarkerKind::SleepEnd)
    }

    /// Whether this kind drives the discard flag
    pub fn is_discard(&self) -> bool {
        matches!(self, MarkerKind::DiscardBefore | MarkerKind::DiscardAfter)
    }

    /// Menu label for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            MarkerKind::SleepStart => "Label Start",
            MarkerKind::SleepEnd => "Label End",
            MarkerKind::DiscardBefore => "Discard data before this point",
            MarkerKind::DiscardAfter => "Discard data after this point",
        }
    }

    /// Get all marker kinds in menu order
    pub fn all() -> &'static [MarkerKind] {
        &[
            MarkerKind::SleepStart,
            MarkerKind::SleepEnd,
            MarkerKind::DiscardBefore,
            MarkerKind::DiscardAfter,
        ]
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerKind::SleepStart => "sleep start",
            MarkerKind::SleepEnd => "sleep end",
            MarkerKind::DiscardBefore => "discard before",
            MarkerKind::DiscardAfter => "discard after",
        };
        f.write_str(name)
    }
}

/// A boundary placed by the user, always on an existing sample timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker {
    pub time: NaiveDateTime,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn new(time: NaiveDateTime, kind: MarkerKind) -> Self {
        Self { time, kind }
    }

    /// Get the time as a plot coordinate
    pub fn plot_x(&self) -> f64 {
        to_plot_x(self.time)
    }
}

/// Convert an instant to plot seconds since the Unix epoch
pub fn to_plot_x(time: NaiveDateTime) -> f64 {
    let utc = time.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
}

/// Convert a plot coordinate back to an instant.
///
/// Rounds to the nearest microsecond, which absorbs the float error of the
/// round trip for any realistic recording date. Returns `None` for
/// non-finite or unrepresentable values.
pub fn from_plot_x(x: f64) -> Option<NaiveDateTime> {
    if !x.is_finite() {
        return None;
    }
    let micros = (x * 1e6).round();
    if micros.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64).map(|dt| dt.naive_utc())
}
