//! Labeling session and folder workflow
//!
//! This module provides the state a reviewer works against: one loaded
//! recording with its markers, and optionally a folder of recordings with a
//! result folder that tracks which ones are done.
//!
//! # Features
//!
//! - Load a recording, replacing the previous one and its markers
//! - Place snapped markers and undo them one at a time
//! - Export the annotated recording atomically
//! - List a source folder and flag recordings already saved to the result folder

pub mod controller;
pub mod folder;
pub mod types;

pub use controller::Session;
pub use folder::{export_file_name, FolderEntry, FolderIndex};
pub use types::{LabelSummary, SessionState, ViewRange};
