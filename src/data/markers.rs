//! Insertion-ordered marker log with single-step undo.
//!
//! The log records boundaries in the order the user placed them. Undo always
//! removes the most recently placed marker, regardless of where it sits on
//! the time axis. Interval meaning is never checked here; the annotator
//! resolves it later from a time-sorted view.

use crate::error::{LabelError, Result};
use crate::types::{Marker, MarkerKind};

/// Result of a successful undo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undone {
    /// The marker that was removed
    pub marker: Marker,
    /// Whether the log is now empty
    pub now_empty: bool,
}

/// Markers in the order they were placed
#[derive(Debug, Clone, Default)]
pub struct MarkerSequence {
    markers: Vec<Marker>,
}

impl MarkerSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker.
    ///
    /// Fails without changing the log if a marker with the same time and
    /// kind is already present.
    pub fn append(&mut self, marker: Marker) -> Result<()> {
        if self.markers.contains(&marker) {
            return Err(LabelError::DuplicateMarker {
                time: marker.time,
                kind: marker.kind.to_string(),
            });
        }
        self.markers.push(marker);
        Ok(())
    }

    /// Remove the most recently appended marker
    pub fn undo(&mut self) -> Result<Undone> {
        let marker = self.markers.pop().ok_or(LabelError::EmptyUndo)?;
        Ok(Undone {
            marker,
            now_empty: self.markers.is_empty(),
        })
    }

    /// Markers whose kind matches `filter`, sorted by time.
    ///
    /// The sort is stable, so markers at the same time keep insertion order.
    pub fn view_by_time(&self, filter: impl Fn(&MarkerKind) -> bool) -> Vec<Marker> {
        let mut view: Vec<Marker> = self.markers.iter().filter(|m| filter(&m.kind)).copied().collect();
        view.sort_by_key(|m| m.time);
        view
    }

    /// Markers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// The most recently appended marker
    pub fn last(&self) -> Option<&Marker> {
        self.markers.last()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Drop every marker
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}
