//! View settings and the pan/zoom arithmetic for the time axis
//!
//! The plot shows a window of the recording's time axis. Keyboard arrows pan
//! by a fraction of the window and zoom symmetrically around its centre; the
//! mouse wheel zooms by a larger factor.
//!
//! # Main Types
//!
//! - [`ViewSettings`] - Persisted preferences for the plot
//! - [`ViewWindow`] - A visible x range with pan/zoom operations

use serde::{Deserialize, Serialize};

/// Smallest window width, in seconds
pub const MIN_WINDOW_SECS: f64 = 1.0;

/// Plot preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Fraction of the window trimmed from each side per wheel step
    #[serde(default = "default_scroll_zoom")]
    pub scroll_zoom: f64,

    /// Fraction of the window trimmed from each side per up/down key
    #[serde(default = "default_key_zoom")]
    pub key_zoom: f64,

    /// Fraction of the window moved per left/right key
    #[serde(default = "default_key_pan")]
    pub key_pan: f64,

    /// Upper bound of the y axis
    #[serde(default = "default_y_max")]
    pub y_max: f64,

    /// Horizontal reference lines (activity cut points)
    #[serde(default = "default_reference_lines")]
    pub reference_lines: Vec<f64>,

    /// Draw sample points on top of the line
    #[serde(default = "default_true")]
    pub show_points: bool,
}

fn default_scroll_zoom() -> f64 {
    0.3
}

fn default_key_zoom() -> f64 {
    0.1
}

fn default_key_pan() -> f64 {
    1.0 / 30.0
}

fn default_y_max() -> f64 {
    3000.0
}

fn default_reference_lines() -> Vec<f64> {
    vec![100.0, 500.0]
}

fn default_true() -> bool {
    true
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            scroll_zoom: default_scroll_zoom(),
            key_zoom: default_key_zoom(),
            key_pan: default_key_pan(),
            y_max: default_y_max(),
            reference_lines: default_reference_lines(),
            show_points: true,
        }
    }
}

/// A visible x range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub min: f64,
    pub max: f64,
}

impl ViewWindow {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Shift by `fraction` of the width (negative moves left)
    pub fn pan(&self, fraction: f64) -> Self {
        let delta = self.width() * fraction;
        Self::new(self.min + delta, self.max + delta)
    }

    /// Trim `fraction` of the width from both sides (negative widens).
    ///
    /// Zooming in never goes below [`MIN_WINDOW_SECS`].
    pub fn zoom(&self, fraction: f64) -> Self {
        let width = self.width();
        let delta = width * fraction;
        if fraction > 0.0 && width - 2.0 * delta < MIN_WINDOW_SECS {
            let centre = (self.min + self.max) / 2.0;
            let half = width.min(MIN_WINDOW_SECS) / 2.0;
            return Self::new(centre - half, centre + half);
        }
        Self::new(self.min + delta, self.max - delta)
    }

    pub fn zoom_in(&self, fraction: f64) -> Self {
        self.zoom(fraction)
    }

    pub fn zoom_out(&self, fraction: f64) -> Self {
        self.zoom(-fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ViewSettings::default();
        assert_eq!(settings.scroll_zoom, 0.3);
        assert_eq!(settings.reference_lines, vec![100.0, 500.0]);
    }

    #[test]
    fn test_settings_fill_missing_fields() {
        let parsed: ViewSettings = serde_json::from_str(r#"{"y_max": 1500.0}"#).unwrap();
        assert_eq!(parsed.y_max, 1500.0);
        assert_eq!(parsed.key_zoom, 0.1);
    }

    #[test]
    fn test_pan() {
        let w = ViewWindow::new(0.0, 300.0).pan(1.0 / 30.0);
        assert!((w.min - 10.0).abs() < 1e-9);
        assert!((w.max - 310.0).abs() < 1e-9);
        let w = ViewWindow::new(0.0, 300.0).pan(-1.0 / 30.0);
        assert!((w.min + 10.0).abs() < 1e-9);
        assert!((w.width() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_in_out() {
        let w = ViewWindow::new(0.0, 100.0);
        assert_eq!(w.zoom_in(0.1), ViewWindow::new(10.0, 90.0));
        assert_eq!(w.zoom_out(0.1), ViewWindow::new(-10.0, 110.0));
    }

    #[test]
    fn test_zoom_in_floor() {
        let w = ViewWindow::new(0.0, 2.0).zoom_in(0.4);
        assert!((w.width() - MIN_WINDOW_SECS).abs() < 1e-9);
        assert!((w.min - 0.5).abs() < 1e-9);
    }
}
