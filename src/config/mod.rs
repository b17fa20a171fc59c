//! Configuration module for the labeling tool
//!
//! This module handles the small amount of state that survives between runs:
//! - The last source and result folders, so a review can pick up where it left off
//! - Plot view preferences
//! - UI preferences
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.acti.labeler/`
//! - **macOS**: `~/Library/Application Support/dev.acti.labeler/`
//! - **Windows**: `%APPDATA%\dev.acti.labeler\`
//!
//! # Files
//!
//! - `app_state.json` - Folders, view settings and preferences

pub mod settings;

pub use settings::*;

use crate::error::{LabelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.acti.labeler";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        LabelError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            LabelError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

// ==================== App State ====================

/// Persistent application state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Folder of recordings opened last
    #[serde(default)]
    pub last_source_dir: Option<PathBuf>,

    /// Folder labeled files were saved into last
    #[serde(default)]
    pub last_result_dir: Option<PathBuf>,

    /// Plot preferences
    #[serde(default)]
    pub view: ViewSettings,

    /// UI preferences
    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            last_source_dir: None,
            last_result_dir: None,
            view: ViewSettings::default(),
            ui_preferences: UiPreferences::default(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            LabelError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(&path)
    }

    /// Load app state from `path`, or defaults if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| LabelError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| LabelError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(&dir.join(APP_STATE_FILE))
    }

    /// Save app state to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| LabelError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LabelError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Last source folder, if it still exists
    pub fn get_last_source_dir(&self) -> Option<&Path> {
        self.last_source_dir
            .as_deref()
            .filter(|p| p.is_dir())
    }

    /// Last result folder, if it still exists
    pub fn get_last_result_dir(&self) -> Option<&Path> {
        self.last_result_dir
            .as_deref()
            .filter(|p| p.is_dir())
    }
}

/// UI preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Enable dark mode
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,

    /// Reopen the last folders on startup
    #[serde(default = "default_restore")]
    pub restore_folders: bool,
}

fn default_dark_mode() -> bool {
    false
}

fn default_restore() -> bool {
    true
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            restore_folders: true,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default() {
        let state = AppState::default();
        assert!(state.last_source_dir.is_none());
        assert_eq!(state.version, 1);
        assert!(state.ui_preferences.restore_folders);
    }

    #[test]
    fn test_app_state_serialization() {
        let mut state = AppState::default();
        state.last_source_dir = Some(PathBuf::from("/data/raw"));
        state.view.y_max = 2000.0;

        let json = serde_json::to_string_pretty(&state).unwrap();
        let parsed: AppState = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.last_source_dir, Some(PathBuf::from("/data/raw")));
        assert_eq!(parsed.view.y_max, 2000.0);
    }

    #[test]
    fn test_partial_state_uses_defaults() {
        let parsed: AppState = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.view, ViewSettings::default());
    }

    #[test]
    fn test_missing_dirs_filtered() {
        let mut state = AppState::default();
        state.last_result_dir = Some(PathBuf::from("/no/such/folder/anywhere"));
        assert!(state.get_last_result_dir().is_none());
    }
}
