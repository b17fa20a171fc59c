//! Action and status types for the frontend
//!
//! Panels return `AppAction`s instead of mutating the session directly, so
//! every change to the labeling state goes through one dispatcher.

use std::path::PathBuf;

use crate::types::MarkerKind;

/// Actions that any panel can emit
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Load a single recording file
    OpenFile(PathBuf),
    /// Open a folder of recordings
    OpenFolder(PathBuf),
    /// Set the folder labeled files are saved into
    SetResultFolder(PathBuf),
    /// Load a recording from the open folder by name
    OpenFromList(String),
    /// Export the annotated recording
    Save(PathBuf),
    /// Place a marker at a plot x coordinate
    Label { x: f64, kind: MarkerKind },
    /// Remove the last marker
    Undo,
    /// Show the about window
    About,
    /// Quit the application
    Exit,
}

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Message shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}
