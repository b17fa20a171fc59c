//! # Acti Labeler: sleep labeling for accelerometer recordings
//!
//! A desktop tool for marking sleep periods and unusable ranges on
//! accelerometer recordings (timestamped axis1/axis2/axis3/vm samples). A
//! reviewer places markers on a plot of the vector magnitude; every marker
//! snaps to a real sample, and the markers are folded into per-sample
//! sleep/discard flags that are written back out as CSV.
//!
//! ## Architecture
//!
//! - **Data**: Recording loading, snapping, markers, annotation and export.
//!   Pure and UI independent.
//! - **Session**: One loaded recording with its markers, plus folder mode
//! - **Frontend**: eframe/egui window with an egui_plot view
//! - **Config**: Persisted folders and view preferences
//!
//! ## Configuration
//!
//! Application state is stored in the platform data directory under
//! `dev.acti.labeler`:
//!
//! - **Linux**: `~/.local/share/dev.acti.labeler/`
//! - **macOS**: `~/Library/Application Support/dev.acti.labeler/`
//! - **Windows**: `%APPDATA%\dev.acti.labeler\`
//!
//! ## Example
//!
//! ```no_run
//! use acti_labeler::{LabelError, MarkerKind, Session};
//!
//! fn main() -> acti_labeler::Result<()> {
//!     let mut session = Session::new();
//!     session.load_file("p01.csv")?;
//!
//!     let (first, last) = session.table().ok_or(LabelError::NoRecording)?.bounds();
//!     session.label(first, MarkerKind::SleepStart)?;
//!     session.label(last, MarkerKind::SleepEnd)?;
//!
//!     session.export("labeled/p01.csv")
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod frontend;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::AppState;
pub use data::{annotate, Annotation, Flags, MarkerSequence, SampleTable};
pub use error::{LabelError, Result};
pub use frontend::LabelerApp;
pub use session::{FolderIndex, Session};
pub use types::{Marker, MarkerKind, Sample};
