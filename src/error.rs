//! Error handling for the labeling tool
//!
//! This module defines the error taxonomy shared by the loader, the
//! labeling session and the exporter, plus a Result alias.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Main error type for labeling operations
#[derive(Error, Debug)]
pub enum LabelError {
    /// Required columns or timestamp source missing on load
    #[error("Schema error: {0}")]
    Schema(String),

    /// A cell could not be parsed as a timestamp or number
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A label coordinate falls outside the loaded recording
    #[error("Time {time} is outside the recording ({first} to {last})")]
    OutOfRange {
        time: NaiveDateTime,
        first: NaiveDateTime,
        last: NaiveDateTime,
    },

    /// Undo requested with nothing to undo
    #[error("Nothing to undo")]
    EmptyUndo,

    /// A marker with the same time and kind is already placed
    #[error("A {kind} marker already exists at {time}")]
    DuplicateMarker { time: NaiveDateTime, kind: String },

    /// Operation needs a loaded recording
    #[error("No recording loaded")]
    NoRecording,

    /// Configuration loading/saving failures
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<LabelError>,
    },
}

impl LabelError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        LabelError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers
    pub fn root(&self) -> &LabelError {
        match self {
            LabelError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is a user-level rejection rather than a failure.
    ///
    /// Rejections leave all state untouched and are reported in the status
    /// bar instead of an error dialog.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.root(),
            LabelError::EmptyUndo
                | LabelError::OutOfRange { .. }
                | LabelError::DuplicateMarker { .. }
                | LabelError::NoRecording
        )
    }
}

/// Result type alias for labeling operations
pub type Result<T> = std::result::Result<T, LabelError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| LabelError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| LabelError::Io(e).with_context(f()))
    }
}
