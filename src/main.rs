//! Geo Clustering Dashboard - upload clustered points and explore them by state.

use anyhow::Context;
use eframe::egui;
use geocluster_dashboard::config::{DashboardConfig, CONFIG_FILE};
use geocluster_dashboard::gui::GeoClusterApp;
use geocluster_dashboard::logging;
use std::path::Path;
use tracing::{error, info};

fn load_config() -> anyhow::Result<DashboardConfig> {
    DashboardConfig::load(Path::new(CONFIG_FILE))
        .with_context(|| format!("loading {}", CONFIG_FILE))
}

fn main() -> eframe::Result<()> {
    logging::init_logging();

    let config = load_config().unwrap_or_else(|e| {
        error!("{:#}, using defaults", e);
        DashboardConfig::default()
    });
    info!(zoom = config.map.zoom, "starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([config.window.min_width, config.window.min_height])
            .with_title("Geo Clustering Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Geo Clustering Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(GeoClusterApp::new(cc, config)))),
    )
}
