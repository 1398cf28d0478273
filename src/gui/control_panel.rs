//! Control Panel Widget
//! Left side panel with upload, state selection, metrics and exports.

use crate::stats::Metrics;
use egui::{Color32, ComboBox, RichText};

/// Left side control panel.
pub struct ControlPanel {
    pub file_name: Option<String>,
    pub states: Vec<String>,
    pub selected_state: String,
    pub metrics: Option<Metrics>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            file_name: None,
            states: Vec::new(),
            selected_state: String::new(),
            metrics: None,
            status: "Upload a CSV or Excel file to begin".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the outcome of a pipeline run.
    pub fn update_results(
        &mut self,
        states: Vec<String>,
        selected: Option<String>,
        metrics: Metrics,
    ) {
        self.states = states;
        self.selected_state = selected.unwrap_or_default();
        self.metrics = Some(metrics);
    }

    /// Drop everything derived from the current upload.
    pub fn clear_results(&mut self) {
        self.states.clear();
        self.selected_state.clear();
        self.metrics = None;
    }

    /// State to request on the next run, if any.
    pub fn requested_state(&self) -> Option<&str> {
        (!self.selected_state.is_empty()).then_some(self.selected_state.as_str())
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🗺 Geo Clustering")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 Upload pincode file").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self
                        .file_name
                        .clone()
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&name).size(12.0).color(
                        if self.file_name.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseFile;
                        }
                    });
                });
            });
        ui.label(RichText::new("CSV or XLSX").size(10.0).color(Color32::GRAY));

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== State Selection =====
        ui.label(RichText::new("📍 Select State").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(!self.states.is_empty(), |ui| {
            ComboBox::from_id_salt("state_select")
                .width(220.0)
                .selected_text(&self.selected_state)
                .show_ui(ui, |ui| {
                    for state in &self.states {
                        if ui
                            .selectable_label(self.selected_state == *state, state)
                            .clicked()
                            && self.selected_state != *state
                        {
                            self.selected_state = state.clone();
                            action = ControlPanelAction::StateChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Metrics =====
        ui.columns(2, |cols| {
            Self::metric(
                &mut cols[0],
                "Total Data Points",
                self.metrics.map(|m| m.total_points),
            );
            Self::metric(
                &mut cols[1],
                "Number of Clusters",
                self.metrics.map(|m| m.cluster_count),
            );
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.metrics.is_some(), |ui| {
                let csv_button = egui::Button::new(RichText::new("📄 Export CSV").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(csv_button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }

                ui.add_space(8.0);

                let png_button = egui::Button::new(RichText::new("🖼 Export Map PNG").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error")
            || self.status.starts_with("Uploaded file does not contain")
        {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn metric(ui: &mut egui::Ui, label: &str, value: Option<usize>) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
                let text = value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
                ui.label(RichText::new(text).size(26.0).strong());
            });
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFile,
    StateChanged,
    ExportCsv,
    ExportPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_state_is_none_until_selected() {
        let mut panel = ControlPanel::new();
        assert_eq!(panel.requested_state(), None);

        panel.update_results(
            vec!["Goa".into(), "Kerala".into()],
            Some("Kerala".into()),
            Metrics {
                total_points: 4,
                cluster_count: 2,
            },
        );
        assert_eq!(panel.requested_state(), Some("Kerala"));

        panel.clear_results();
        assert_eq!(panel.requested_state(), None);
        assert!(panel.states.is_empty());
        assert_eq!(panel.metrics, None);
    }
}
