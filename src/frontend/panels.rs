//! Panel components for the labeling UI
//!
//! # Panels
//!
//! - [`FileListPanel`] - Recordings of the open folder, labeled ones greyed out
//! - [`LabelingToolbar`] - Undo and the folder summary above the plot

use crate::frontend::state::AppAction;
use crate::session::{FolderEntry, FolderIndex, Session};
use egui::{Color32, RichText, Ui};
use std::path::Path;

/// Renders the folder file list
pub struct FileListPanel;

impl FileListPanel {
    /// Render the list of recordings in the open folder
    pub fn render(
        ui: &mut Ui,
        folder: &FolderIndex,
        source_dir: &Path,
        current: Option<&str>,
        actions: &mut Vec<AppAction>,
    ) {
        ui.heading("Recordings");

        ui.label(RichText::new(source_dir.display().to_string()).small());
        match folder.result_dir() {
            Some(dir) => {
                ui.label(RichText::new(format!("→ {}", dir.display())).small());
            }
            None => {
                ui.colored_label(Color32::YELLOW, RichText::new("No result folder set").small());
            }
        }

        let (done, total) = folder.progress();
        ui.label(format!("{} / {} labeled", done, total));

        ui.separator();

        let entries = folder.entries();
        if entries.is_empty() {
            ui.colored_label(Color32::GRAY, "No CSV files in this folder");
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in &entries {
                    Self::render_entry(ui, entry, current == Some(entry.name.as_str()), actions);
                }
            });
    }

    fn render_entry(ui: &mut Ui, entry: &FolderEntry, is_current: bool, actions: &mut Vec<AppAction>) {
        let text = if entry.labeled {
            RichText::new(format!("✔ {}", entry.name)).color(Color32::GRAY)
        } else {
            RichText::new(&entry.name)
        };

        let response = ui.selectable_label(is_current, text);
        if response.clicked() && !is_current {
            actions.push(AppAction::OpenFromList(entry.name.clone()));
        }
    }
}

/// Renders the row of labeling controls above the plot
pub struct LabelingToolbar;

impl LabelingToolbar {
    pub fn render(ui: &mut Ui, session: &Session, actions: &mut Vec<AppAction>) {
        ui.horizontal(|ui| {
            let can_undo = !session.markers().is_empty();
            if ui
                .add_enabled(can_undo, egui::Button::new("↶ Undo"))
                .on_hover_text("Remove the last marker (Ctrl+Z)")
                .clicked()
            {
                actions.push(AppAction::Undo);
            }

            if let Some(last) = session.markers().last() {
                ui.separator();
                ui.label(
                    RichText::new(format!("Last: {} at {}", last.kind, last.time))
                        .small(),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new("Right-click to label · ←/→ pan · ↑/↓ zoom")
                        .small()
                        .color(Color32::GRAY),
                );
            });
        });
    }
}
