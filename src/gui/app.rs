//! Geo Clustering Dashboard Main Application
//! Main window with control panel and map viewer.

use crate::config::DashboardConfig;
use crate::data::DataLoader;
use crate::export::{export_csv, export_png, ExportError};
use crate::gui::{ControlPanel, ControlPanelAction, MapViewer};
use crate::pipeline::{run_pipeline_with, PipelineError};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// The uploaded file, kept so a state change can re-run the pipeline.
struct Upload {
    name: String,
    bytes: Vec<u8>,
}

/// Main application window.
pub struct GeoClusterApp {
    config: DashboardConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    map_viewer: MapViewer,
    upload: Option<Upload>,
}

impl GeoClusterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            loader: DataLoader::new(config.loader.clone()),
            config,
            control_panel: ControlPanel::new(),
            map_viewer: MapViewer::new(),
            upload: None,
        }
    }

    /// Handle file selection
    fn handle_browse_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV or Excel", &["csv", "xlsx"])
            .pick_file()
        else {
            return;
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.control_panel.file_name = Some(name.clone());

        match std::fs::read(&path) {
            Ok(bytes) => {
                self.upload = Some(Upload { name, bytes });
                self.control_panel.selected_state.clear();
                self.run();
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to read upload");
                self.upload = None;
                self.show_failure(&format!("Error: {}", e));
            }
        }
    }

    /// Re-run the pipeline from the cached upload and current selection.
    fn run(&mut self) {
        let Some(upload) = &self.upload else {
            return;
        };

        match run_pipeline_with(
            &self.loader,
            &upload.bytes,
            &upload.name,
            self.control_panel.requested_state(),
        ) {
            Ok(output) => {
                self.control_panel.update_results(
                    output.states.clone(),
                    output.selected_state.clone(),
                    output.metrics,
                );
                let mut status = format!("Loaded {}: {} states", upload.name, output.states.len());
                if output.out_of_range > 0 {
                    status.push_str(&format!(
                        ", {} coordinates out of range",
                        output.out_of_range
                    ));
                }
                self.control_panel.set_status(&status);
                self.map_viewer.set_output(output);
            }
            Err(e) => {
                let message = match e {
                    PipelineError::Validation(v) => v.to_string(),
                    other => format!("Error: {}", other),
                };
                self.show_failure(&message);
            }
        }
    }

    /// Halt: nothing from the failed upload stays on screen.
    fn show_failure(&mut self, message: &str) {
        self.control_panel.clear_results();
        self.map_viewer.clear();
        self.control_panel.set_status(message);
    }

    fn handle_export(&mut self, action: ControlPanelAction) {
        let Some(output) = &self.map_viewer.output else {
            self.control_panel.set_status("Nothing to export");
            return;
        };

        let stem = output
            .selected_state
            .as_deref()
            .unwrap_or("clusters")
            .replace(' ', "_")
            .to_lowercase();

        let result = match action {
            ControlPanelAction::ExportCsv => Self::save_dialog("CSV", "csv", &stem)
                .map(|path| export_csv(output, &path).map(|_| path)),
            ControlPanelAction::ExportPng => Self::save_dialog("PNG Image", "png", &stem)
                .map(|path| export_png(output, &path, &self.config.export).map(|_| path)),
            _ => None,
        };

        match result {
            Some(Ok(path)) => self.control_panel.set_status(&format!(
                "Exported {}",
                Self::display_name(&path)
            )),
            Some(Err(e)) => self.report_export_error(e),
            None => {} // User cancelled
        }
    }

    fn save_dialog(filter: &str, extension: &str, stem: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(filter, &[extension])
            .set_file_name(format!("{}.{}", stem, extension))
            .save_file()
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }

    fn report_export_error(&mut self, e: ExportError) {
        error!(error = %e, "export failed");
        self.control_panel.set_status(&format!("Error: {}", e));
    }
}

impl eframe::App for GeoClusterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseFile => self.handle_browse_file(),
                        ControlPanelAction::StateChanged => {
                            info!(state = %self.control_panel.selected_state, "state selected");
                            self.run();
                        }
                        ControlPanelAction::ExportCsv | ControlPanelAction::ExportPng => {
                            self.handle_export(action)
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Map Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.map_viewer.show(ui, &self.config.map);
        });
    }
}
