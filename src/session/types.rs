//! Session data types

use serde::{Deserialize, Serialize};

/// State of the labeling session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No recording loaded
    #[default]
    Empty,
    /// A recording is loaded and can be labeled
    Loaded,
}

impl SessionState {
    /// Check if a recording is loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, SessionState::Loaded)
    }

    /// Display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionState::Empty => "No recording",
            SessionState::Loaded => "Labeling",
        }
    }
}

/// Visible x range of the plot, in plot seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRange {
    pub min: f64,
    pub max: f64,
}

impl ViewRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the range
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Summary of the current labeling, shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelSummary {
    pub samples: usize,
    pub markers: usize,
    pub asleep: usize,
    pub kept: usize,
}
