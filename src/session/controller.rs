//! The labeling session for one active recording.
//!
//! [`Session`] owns the loaded [`SampleTable`] and its [`MarkerSequence`].
//! All changes go through [`Session::load`], [`Session::label`],
//! [`Session::undo`] and [`Session::export`]; each either completes or
//! returns an error with the session unchanged. Flags are never cached: the
//! annotation is recomputed from the current markers on every call, so an
//! undo is reflected everywhere immediately.

use crate::data::annotate::{annotate, Annotation};
use crate::data::export::export_to_file;
use crate::data::markers::{MarkerSequence, Undone};
use crate::data::snap::{snap, snap_plot_x};
use crate::data::table::SampleTable;
use crate::error::{LabelError, Result};
use crate::session::types::{LabelSummary, SessionState, ViewRange};
use crate::types::{Marker, MarkerKind};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// A recording and the markers placed on it
#[derive(Debug, Default)]
pub struct Session {
    table: Option<SampleTable>,
    markers: MarkerSequence,
    source_path: Option<PathBuf>,
    saved_view: Option<ViewRange>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.table.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Empty
        }
    }

    /// The loaded recording
    pub fn table(&self) -> Option<&SampleTable> {
        self.table.as_ref()
    }

    pub fn markers(&self) -> &MarkerSequence {
        &self.markers
    }

    /// Path the recording was loaded from, if it came from a file
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// View to restore when the plot is rebuilt
    pub fn saved_view(&self) -> Option<ViewRange> {
        self.saved_view
    }

    pub fn set_saved_view(&mut self, view: Option<ViewRange>) {
        self.saved_view = view;
    }

    /// Replace the recording, dropping all markers and the saved view
    pub fn load(&mut self, table: SampleTable) {
        tracing::info!(
            "Loaded {} ({} samples, {} markers cleared)",
            table.source_name(),
            table.len(),
            self.markers.len()
        );
        self.table = Some(table);
        self.markers.clear();
        self.saved_view = None;
        self.source_path = None;
    }

    /// Read a recording file and load it.
    ///
    /// On failure the current recording and markers are kept.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let table = SampleTable::load_file(path)?;
        self.load(table);
        self.source_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Place a marker at the sample nearest to `t`
    pub fn label(&mut self, t: NaiveDateTime, kind: MarkerKind) -> Result<Marker> {
        let table = self.table.as_ref().ok_or(LabelError::NoRecording)?;
        let time = snap(table, t)?;
        self.push(Marker::new(time, kind))
    }

    /// Place a marker at the sample nearest to a plot x coordinate
    pub fn label_at_plot_x(&mut self, x: f64, kind: MarkerKind) -> Result<Marker> {
        let table = self.table.as_ref().ok_or(LabelError::NoRecording)?;
        let time = snap_plot_x(table, x)?;
        self.push(Marker::new(time, kind))
    }

    fn push(&mut self, marker: Marker) -> Result<Marker> {
        self.markers.append(marker)?;
        tracing::debug!("Placed {} marker at {}", marker.kind, marker.time);
        Ok(marker)
    }

    /// Remove the most recently placed marker
    pub fn undo(&mut self) -> Result<Undone> {
        let undone = self.markers.undo()?;
        tracing::debug!(
            "Removed {} marker at {}",
            undone.marker.kind,
            undone.marker.time
        );
        Ok(undone)
    }

    /// Flags for the current recording and markers
    pub fn annotate(&self) -> Result<Annotation> {
        let table = self.table.as_ref().ok_or(LabelError::NoRecording)?;
        Ok(annotate(table, &self.markers))
    }

    /// Counts for the status bar
    pub fn summary(&self) -> LabelSummary {
        match (&self.table, self.annotate()) {
            (Some(table), Ok(annotation)) => LabelSummary {
                samples: table.len(),
                markers: self.markers.len(),
                asleep: annotation.sleep_count(),
                kept: annotation.kept_count(),
            },
            _ => LabelSummary::default(),
        }
    }

    /// Write the annotated recording to `path`
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let table = self.table.as_ref().ok_or(LabelError::NoRecording)?;
        let annotation = annotate(table, &self.markers);
        export_to_file(path, table, &annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use chrono::{NaiveDate, TimeDelta};

    fn t(s: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 8, 9)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
            + TimeDelta::seconds(s)
    }

    fn table(name: &str, n: i64) -> SampleTable {
        let samples = (0..n).map(|s| Sample::new(t(s * 60), 0.0, 0.0, 0.0, 10.0)).collect();
        SampleTable::from_samples(samples, name).unwrap()
    }

    #[test]
    fn test_empty_session_rejects() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(matches!(
            session.label(t(0), MarkerKind::SleepStart),
            Err(LabelError::NoRecording)
        ));
        assert!(matches!(session.undo(), Err(LabelError::EmptyUndo)));
        assert!(session.annotate().is_err());
        assert_eq!(session.summary(), LabelSummary::default());
    }

    #[test]
    fn test_label_snaps() {
        let mut session = Session::new();
        session.load(table("a.csv", 5));
        let marker = session.label(t(100), MarkerKind::SleepStart).unwrap();
        assert_eq!(marker.time, t(120));
        assert_eq!(session.markers().len(), 1);
    }

    #[test]
    fn test_out_of_range_no_mutation() {
        let mut session = Session::new();
        session.load(table("a.csv", 3));
        assert!(matches!(
            session.label(t(-1), MarkerKind::SleepStart),
            Err(LabelError::OutOfRange { .. })
        ));
        assert!(session.markers().is_empty());
    }

    #[test]
    fn test_load_clears_markers_and_view() {
        let mut session = Session::new();
        session.load(table("a.csv", 3));
        session.label(t(0), MarkerKind::DiscardBefore).unwrap();
        session.set_saved_view(Some(ViewRange::new(0.0, 1.0)));

        session.load(table("b.csv", 4));
        assert!(session.markers().is_empty());
        assert!(session.saved_view().is_none());
        assert_eq!(session.table().unwrap().source_name(), "b.csv");
    }

    #[test]
    fn test_failed_load_keeps_previous() {
        let mut session = Session::new();
        session.load(table("a.csv", 3));
        session.label(t(60), MarkerKind::SleepStart).unwrap();

        assert!(session.load_file("/definitely/not/here.csv").is_err());
        assert_eq!(session.table().unwrap().source_name(), "a.csv");
        assert_eq!(session.markers().len(), 1);
    }

    #[test]
    fn test_undo_keeps_view() {
        let mut session = Session::new();
        session.load(table("a.csv", 3));
        session.label(t(60), MarkerKind::SleepStart).unwrap();
        session.set_saved_view(Some(ViewRange::new(5.0, 6.0)));
        let undone = session.undo().unwrap();
        assert!(undone.now_empty);
        assert_eq!(session.saved_view(), Some(ViewRange::new(5.0, 6.0)));
    }

    #[test]
    fn test_summary() {
        let mut session = Session::new();
        session.load(table("a.csv", 6));
        session.label(t(60), MarkerKind::SleepStart).unwrap();
        session.label(t(180), MarkerKind::SleepEnd).unwrap();
        session.label(t(0), MarkerKind::DiscardBefore).unwrap();
        assert_eq!(
            session.summary(),
            LabelSummary {
                samples: 6,
                markers: 3,
                asleep: 2,
                kept: 5,
            }
        );
    }
}
