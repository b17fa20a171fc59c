//! Acti Label Tool - Main Entry Point
//!
//! Usage: `acti-labeler [PATH]`. A file path opens that recording, a folder
//! path opens it in folder mode.

use acti_labeler::{config::AppState, LabelerApp};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,acti_labeler=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Acti Label Tool");

    let initial = std::env::args_os().nth(1).map(PathBuf::from);
    if let Some(path) = &initial {
        if !path.exists() {
            anyhow::bail!("{} does not exist", path.display());
        }
    }

    // Load application state (last folders, preferences)
    let app_state = AppState::load_or_default();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Acti :: Label Tool"),
        ..Default::default()
    };

    eframe::run_native(
        "Acti :: Label Tool",
        native_options,
        Box::new(|cc| Ok(Box::new(LabelerApp::new(cc, app_state, initial)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run window: {}", e))?;

    tracing::info!("Shutting down...");
    Ok(())
}
