//! Frontend module for egui UI
//!
//! This module provides the labeling window using eframe/egui. It owns the
//! [`Session`] and [`FolderIndex`] and routes every user interaction through
//! [`AppAction`]s so the session only changes in one place.
//!
//! # Layout
//!
//! - Menu bar: File (open, open folder, save, result folder, exit) and Help
//! - Left panel: recordings of the open folder
//! - Central panel: labeling toolbar and the recording plot
//! - Bottom panel: status bar
//!
//! # Main Types
//!
//! - [`LabelerApp`] - Main application state implementing [`eframe::App`]
//!
//! # Submodules
//!
//! - `markers` - Marker colors and the right-click labeling menu
//! - `panels` - File list and labeling toolbar
//! - `plot` - Recording plot with egui_plot
//! - `state` - Actions and status messages
//! - `status_bar` - Bottom status bar

pub mod markers;
mod panels;
pub mod plot;
pub mod state;
mod status_bar;

pub use panels::*;
pub use plot::{PlotState, ViewOp};
pub use state::{AppAction, StatusLevel, StatusMessage};

use crate::config::AppState;
use crate::error::LabelError;
use crate::session::{export_file_name, FolderIndex, Session};
use status_bar::{render_status_bar, StatusBarContext};
use std::path::{Path, PathBuf};

/// Main application state for the label tool
pub struct LabelerApp {
    session: Session,
    folder: FolderIndex,
    app_state: AppState,
    plot: PlotState,
    status: Option<StatusMessage>,
    show_about: bool,
    exit_requested: bool,
}

impl LabelerApp {
    /// Create the app, opening `initial` if given (a file or a folder)
    pub fn new(cc: &eframe::CreationContext<'_>, app_state: AppState, initial: Option<PathBuf>) -> Self {
        if app_state.ui_preferences.dark_mode {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }

        let mut app = Self::with_state(app_state);
        match initial {
            Some(path) if path.is_dir() => app.handle_action(AppAction::OpenFolder(path)),
            Some(path) => app.handle_action(AppAction::OpenFile(path)),
            None => app.restore_folders(),
        }
        app
    }

    /// Create the app without a window
    pub fn with_state(app_state: AppState) -> Self {
        Self {
            session: Session::new(),
            folder: FolderIndex::new(),
            app_state,
            plot: PlotState::new(),
            status: None,
            show_about: false,
            exit_requested: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn folder(&self) -> &FolderIndex {
        &self.folder
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    fn restore_folders(&mut self) {
        if !self.app_state.ui_preferences.restore_folders {
            return;
        }
        if let Some(dir) = self.app_state.get_last_source_dir().map(Path::to_path_buf) {
            tracing::info!("Restoring source folder {:?}", dir);
            if let Err(e) = self.folder.set_source_dir(dir) {
                tracing::warn!("Failed to restore source folder: {}", e);
            }
        }
        if let Some(dir) = self.app_state.get_last_result_dir().map(Path::to_path_buf) {
            if let Err(e) = self.folder.set_result_dir(dir) {
                tracing::warn!("Failed to restore result folder: {}", e);
            }
        }
    }

    fn report(&mut self, e: LabelError) {
        if e.is_rejection() {
            tracing::debug!("Rejected: {}", e);
            self.status = Some(StatusMessage::warning(e.to_string()));
        } else {
            tracing::error!("{}", e);
            self.status = Some(StatusMessage::error(e.to_string()));
        }
    }

    fn open_file(&mut self, path: &Path) {
        match self.session.load_file(path) {
            Ok(()) => {
                let summary = self.session.summary();
                let mut text = format!("Loaded {} samples", summary.samples);
                if let Some(table) = self.session.table() {
                    if table.dropped_duplicates() > 0 {
                        text.push_str(&format!(
                            " ({} duplicate timestamps dropped)",
                            table.dropped_duplicates()
                        ));
                    }
                }
                self.status = Some(StatusMessage::info(text));
            }
            Err(e) => self.report(e),
        }
    }

    /// Apply one action to the session
    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::OpenFile(path) => self.open_file(&path),
            AppAction::OpenFolder(dir) => match self.folder.set_source_dir(&dir) {
                Ok(()) => {
                    self.app_state.last_source_dir = Some(dir);
                    let (_, total) = self.folder.progress();
                    self.status = Some(StatusMessage::info(format!("{} recordings in folder", total)));
                }
                Err(e) => self.report(e),
            },
            AppAction::SetResultFolder(dir) => match self.folder.set_result_dir(&dir) {
                Ok(()) => {
                    self.app_state.last_result_dir = Some(dir);
                }
                Err(e) => self.report(e),
            },
            AppAction::OpenFromList(name) => {
                if let Some(path) = self.folder.source_path(&name) {
                    self.open_file(&path);
                }
            }
            AppAction::Save(path) => match self.session.export(&path) {
                Ok(()) => {
                    self.status = Some(StatusMessage::info(format!("Saved {}", path.display())));
                    if self.folder.source_dir().is_some() {
                        match self.folder.note_export(&path) {
                            Ok(()) => {
                                self.app_state.last_result_dir =
                                    self.folder.result_dir().map(Path::to_path_buf);
                            }
                            Err(e) => tracing::warn!("Failed to refresh folders: {}", e),
                        }
                    }
                }
                Err(e) => self.report(e),
            },
            AppAction::Label { x, kind } => match self.session.label_at_plot_x(x, kind) {
                Ok(marker) => {
                    self.status = Some(StatusMessage::info(format!("{} at {}", marker.kind, marker.time)));
                }
                Err(e) => self.report(e),
            },
            AppAction::Undo => match self.session.undo() {
                Ok(undone) => {
                    let text = if undone.now_empty {
                        format!("Removed {} (no markers left)", undone.marker.kind)
                    } else {
                        format!("Removed {}", undone.marker.kind)
                    };
                    self.status = Some(StatusMessage::info(text));
                }
                Err(LabelError::EmptyUndo) => {
                    self.status = Some(StatusMessage::info("Nothing to undo"));
                }
                Err(e) => self.report(e),
            },
            AppAction::About => self.show_about = true,
            AppAction::Exit => self.exit_requested = true,
        }
    }

    fn pick_open_file() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .pick_file()
    }

    /// Where the save dialog starts: the result folder, else next to the source
    fn default_save_target(&self) -> Option<PathBuf> {
        let source_name = self.session.table()?.source_name();
        let target = self.folder.default_export_path(source_name).unwrap_or_else(|| {
            let name = export_file_name(source_name);
            match self.folder.source_dir() {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        });
        Some(target)
    }

    fn pick_save_path(&self) -> Option<PathBuf> {
        let target = self.default_save_target()?;
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save Labeled File")
            .add_filter("CSV", &["csv"]);
        if let Some(name) = target.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        if let Some(dir) = target.parent().filter(|d| !d.as_os_str().is_empty()) {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::Key;

        if ctx.memory(|m| m.focused().is_some()) {
            return;
        }

        let view = &self.app_state.view;
        let mut ops = Vec::new();
        let mut undo = false;
        let mut save = false;
        let mut open = false;

        ctx.input(|i| {
            if !i.modifiers.any() {
                if i.key_pressed(Key::ArrowLeft) {
                    ops.push(ViewOp::Pan(-view.key_pan));
                }
                if i.key_pressed(Key::ArrowRight) {
                    ops.push(ViewOp::Pan(view.key_pan));
                }
                if i.key_pressed(Key::ArrowUp) {
                    ops.push(ViewOp::ZoomIn(view.key_zoom));
                }
                if i.key_pressed(Key::ArrowDown) {
                    ops.push(ViewOp::ZoomOut(view.key_zoom));
                }
            }

            if i.key_pressed(Key::Z) && i.modifiers.command_only() {
                undo = true;
            }
            if i.key_pressed(Key::S) && i.modifiers.command_only() {
                save = true;
            }
            if i.key_pressed(Key::O) && i.modifiers.command_only() {
                open = true;
            }
        });

        if self.session.state().is_loaded() {
            for op in ops {
                self.plot.push(op);
            }
        }

        if undo {
            self.handle_action(AppAction::Undo);
        }
        if save {
            if let Some(path) = self.pick_save_path() {
                self.handle_action(AppAction::Save(path));
            }
        }
        if open {
            if let Some(path) = Self::pick_open_file() {
                self.handle_action(AppAction::OpenFile(path));
            }
        }
    }

    fn render_about(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Acti Label Tool");
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.label("Mark sleep periods and discard ranges on accelerometer recordings.");
                ui.label("Right-click the plot to place a marker at the nearest sample.");
            });
    }
}

impl eframe::App for LabelerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard_shortcuts(ctx);

        let mut actions = Vec::new();
        let loaded = self.session.state().is_loaded();

        // Menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open...").clicked() {
                        if let Some(path) = Self::pick_open_file() {
                            actions.push(AppAction::OpenFile(path));
                        }
                        ui.close();
                    }
                    if ui.button("Open Folder...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            actions.push(AppAction::OpenFolder(dir));
                        }
                        ui.close();
                    }
                    if ui.add_enabled(loaded, egui::Button::new("Save...")).clicked() {
                        if let Some(path) = self.pick_save_path() {
                            actions.push(AppAction::Save(path));
                        }
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Set Result Folder...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            actions.push(AppAction::SetResultFolder(dir));
                        }
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        actions.push(AppAction::Exit);
                        ui.close();
                    }
                });

                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        actions.push(AppAction::About);
                        ui.close();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let summary = self.session.summary();
            render_status_bar(
                ui,
                &StatusBarContext {
                    state: self.session.state(),
                    summary,
                    message: self.status.as_ref(),
                },
            );
        });

        // Folder file list
        if let Some(source_dir) = self.folder.source_dir() {
            egui::SidePanel::left("file_list")
                .resizable(true)
                .default_width(220.0)
                .show(ctx, |ui| {
                    let current = self.session.table().map(|t| t.source_name());
                    FileListPanel::render(ui, &self.folder, source_dir, current, &mut actions);
                });
        }

        // Plot
        egui::CentralPanel::default().show(ctx, |ui| {
            if loaded {
                LabelingToolbar::render(ui, &self.session, &mut actions);
                ui.separator();
            }
            let plot_actions = plot::render(&mut self.plot, &mut self.session, &self.app_state.view, ui);
            actions.extend(plot_actions);
        });

        for action in actions {
            self.handle_action(action);
        }

        self.render_about(ctx);

        if self.exit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{to_plot_x, MarkerKind};
    use std::fs;

    const RECORDING: &str = "timestamp,axis1,axis2,axis3,vm\n\
        2022-08-09 21:00:00,1,1,1,50\n\
        2022-08-09 21:00:01,1,1,1,600\n\
        2022-08-09 21:00:02,1,1,1,600\n";

    fn app_with_recording(dir: &Path) -> (LabelerApp, PathBuf) {
        let path = dir.join("p01.csv");
        fs::write(&path, RECORDING).unwrap();
        let mut app = LabelerApp::with_state(AppState::default());
        app.handle_action(AppAction::OpenFile(path.clone()));
        (app, path)
    }

    fn first_x(app: &LabelerApp) -> f64 {
        to_plot_x(app.session().table().unwrap().bounds().0)
    }

    #[test]
    fn test_open_file_loads_session() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = app_with_recording(dir.path());
        assert!(app.session().state().is_loaded());
        assert_eq!(app.status().unwrap().level, StatusLevel::Info);
    }

    #[test]
    fn test_open_missing_file_reports_error() {
        let mut app = LabelerApp::with_state(AppState::default());
        app.handle_action(AppAction::OpenFile(PathBuf::from("/no/such/file.csv")));
        assert!(!app.session().state().is_loaded());
        assert_eq!(app.status().unwrap().level, StatusLevel::Error);
    }

    #[test]
    fn test_label_outside_recording_is_warning() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_recording(dir.path());
        let x = first_x(&app) - 100.0;
        app.handle_action(AppAction::Label {
            x,
            kind: MarkerKind::SleepStart,
        });
        assert!(app.session().markers().is_empty());
        assert_eq!(app.status().unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn test_label_then_undo() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_recording(dir.path());
        let x = first_x(&app) + 1.2;
        app.handle_action(AppAction::Label {
            x,
            kind: MarkerKind::SleepStart,
        });
        assert_eq!(app.session().markers().len(), 1);

        app.handle_action(AppAction::Undo);
        assert!(app.session().markers().is_empty());

        app.handle_action(AppAction::Undo);
        assert_eq!(app.status().unwrap().text, "Nothing to undo");
    }

    #[test]
    fn test_save_in_folder_mode_marks_labeled() {
        let source = tempfile::tempdir().unwrap();
        let results = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_recording(source.path());
        app.handle_action(AppAction::OpenFolder(source.path().to_path_buf()));
        assert_eq!(app.folder().progress(), (0, 1));

        let target = results.path().join("p01.csv");
        app.handle_action(AppAction::Save(target.clone()));

        assert!(target.exists());
        assert_eq!(app.folder().result_dir(), Some(results.path()));
        assert!(app.folder().is_labeled("p01.csv"));
    }

    #[test]
    fn test_save_target_prefers_result_folder() {
        let source = tempfile::tempdir().unwrap();
        let results = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_recording(source.path());
        assert_eq!(app.default_save_target(), Some(PathBuf::from("p01.csv")));

        app.handle_action(AppAction::OpenFolder(source.path().to_path_buf()));
        assert_eq!(app.default_save_target(), Some(source.path().join("p01.csv")));

        app.handle_action(AppAction::SetResultFolder(results.path().to_path_buf()));
        assert_eq!(app.default_save_target(), Some(results.path().join("p01.csv")));
    }

    #[test]
    fn test_failed_folder_refresh_keeps_saved_result_dir() {
        let source = tempfile::tempdir().unwrap();
        let results = tempfile::tempdir().unwrap();
        let (mut app, _) = app_with_recording(source.path());
        app.handle_action(AppAction::OpenFolder(source.path().to_path_buf()));
        app.handle_action(AppAction::SetResultFolder(results.path().to_path_buf()));

        // the source folder vanishes, so the post-save listing fails
        let target = results.path().join("p01.csv");
        drop(source);
        app.handle_action(AppAction::Save(target.clone()));

        assert!(target.exists());
        assert_eq!(app.folder().result_dir(), Some(results.path()));
        assert_eq!(app.app_state.last_result_dir.as_deref(), Some(results.path()));
    }

    #[test]
    fn test_exit_sets_flag() {
        let mut app = LabelerApp::with_state(AppState::default());
        app.handle_action(AppAction::Exit);
        assert!(app.exit_requested);
    }
}
