//! Snapping of picked coordinates onto real samples.
//!
//! Markers are only ever stored on existing sample timestamps. A pick that
//! lands between two samples moves to the closer one, and an exact midpoint
//! moves to the earlier one. Picks outside the recording are rejected rather
//! than clamped, so a click in the empty margin of the plot never produces a
//! boundary at the first or last sample by accident.

use crate::data::table::SampleTable;
use crate::error::{LabelError, Result};
use crate::types::{from_plot_x, to_plot_x};
use chrono::NaiveDateTime;

/// Snap `t` to the nearest sample timestamp in `table`
pub fn snap(table: &SampleTable, t: NaiveDateTime) -> Result<NaiveDateTime> {
    let (first, last) = table.bounds();
    if t < first || t > last {
        return Err(LabelError::OutOfRange { time: t, first, last });
    }
    Ok(table.samples()[table.nearest_index(t)].timestamp)
}

/// Snap a plot x coordinate (seconds since the epoch)
pub fn snap_plot_x(table: &SampleTable, x: f64) -> Result<NaiveDateTime> {
    match from_plot_x(x) {
        Some(t) => snap(table, t),
        None => {
            let (first, last) = table.bounds();
            let time = if x < to_plot_x(first) {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            };
            Err(LabelError::OutOfRange { time, first, last })
        }
    }
}
