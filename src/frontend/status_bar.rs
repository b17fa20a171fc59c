//! Status bar panel, the bottom bar showing session counts and the last message.

use egui::{Color32, RichText, Ui};

use crate::frontend::state::{StatusLevel, StatusMessage};
use crate::session::{LabelSummary, SessionState};

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub state: SessionState,
    pub summary: LabelSummary,
    pub message: Option<&'a StatusMessage>,
}

fn level_color(level: StatusLevel) -> Color32 {
    match level {
        StatusLevel::Info => Color32::GRAY,
        StatusLevel::Warning => Color32::YELLOW,
        StatusLevel::Error => Color32::LIGHT_RED,
    }
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let state_color = if ctx.state.is_loaded() {
            Color32::GREEN
        } else {
            Color32::GRAY
        };
        ui.colored_label(state_color, "●");
        ui.label(RichText::new(ctx.state.display_name()).small());

        if ctx.state.is_loaded() {
            let summary = &ctx.summary;

            ui.separator();
            ui.label(RichText::new(format!("Samples: {}", summary.samples)).small());

            ui.separator();
            ui.label(RichText::new(format!("Markers: {}", summary.markers)).small());

            ui.separator();
            ui.label(RichText::new(format!("Asleep: {}", summary.asleep)).small());

            ui.separator();
            let discarded = summary.samples.saturating_sub(summary.kept);
            let discard_color = if discarded > 0 {
                Color32::LIGHT_RED
            } else {
                Color32::GRAY
            };
            ui.colored_label(
                discard_color,
                RichText::new(format!("Discarded: {}", discarded)).small(),
            );
        }

        if let Some(message) = ctx.message {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(
                    level_color(message.level),
                    RichText::new(&message.text).small(),
                );
            });
        }
    });
}
