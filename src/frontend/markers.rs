//! Marker presentation: colors and the right-click labeling menu.

use egui::{Color32, Ui};

use crate::frontend::state::AppAction;
use crate::types::MarkerKind;

/// Get the color used to draw markers of `kind`
pub fn marker_color(kind: MarkerKind) -> Color32 {
    match kind {
        MarkerKind::SleepStart => Color32::from_rgb(50, 205, 50), // Lime green
        MarkerKind::SleepEnd => Color32::from_rgb(34, 139, 34),   // Forest green
        MarkerKind::DiscardBefore => Color32::from_rgb(255, 99, 71), // Tomato red
        MarkerKind::DiscardAfter => Color32::from_rgb(178, 34, 34),  // Firebrick
    }
}

/// Fill for sleep shading
pub const SLEEP_FILL: Color32 = Color32::from_rgba_premultiplied(60, 60, 60, 100);

/// Hover crosshair
pub const CURSOR_COLOR: Color32 = Color32::from_rgb(0, 160, 0);

/// Fill for discard shading
pub const DISCARD_FILL: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 200);

/// Contents of the labeling popup for a pick at plot coordinate `x`
pub fn label_menu(ui: &mut Ui, x: f64, actions: &mut Vec<AppAction>) {
    for (i, kind) in MarkerKind::all().iter().enumerate() {
        if i == 2 {
            ui.separator();
        }
        if ui.button(kind.display_name()).clicked() {
            actions.push(AppAction::Label { x, kind: *kind });
            ui.close();
        }
    }
    ui.separator();
    if ui.button("Cancel").clicked() {
        ui.close();
    }
}
