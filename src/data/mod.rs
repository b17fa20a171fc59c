//! Recording data and the labeling core
//!
//! This module holds everything that gives a recording its meaning, with
//! no dependency on the UI:
//!
//! - [`table`] - Loading a recording into an immutable [`SampleTable`]
//! - [`snap`] - Moving a picked time onto the nearest real sample
//! - [`markers`] - The insertion-ordered [`MarkerSequence`] with undo
//! - [`annotate`] - Turning markers into per-sample sleep/discard flags
//! - [`export`] - Writing the annotated table
//! - [`csv`] - The small CSV reader/writer the above share

pub mod annotate;
pub mod csv;
pub mod export;
pub mod markers;
pub mod snap;
pub mod table;

pub use annotate::{annotate, Annotation, Flags};
pub use markers::{MarkerSequence, Undone};
pub use snap::{snap, snap_plot_x};
pub use table::SampleTable;
