//! Map Viewer Widget
//! Central panel showing the cluster map and the cluster summary table.

use crate::charts::MapPlotter;
use crate::config::MapConfig;
use crate::pipeline::PipelineOutput;
use egui::{RichText, ScrollArea};

/// Space kept below the map for the summary table.
const TABLE_RESERVE: f32 = 220.0;
const MIN_MAP_HEIGHT: f32 = 300.0;

#[derive(Default)]
pub struct MapViewer {
    pub output: Option<PipelineOutput>,
    /// Re-center the map on the next frame.
    reset_view: bool,
}

impl MapViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_output(&mut self, output: PipelineOutput) {
        self.output = Some(output);
        self.reset_view = true;
    }

    pub fn clear(&mut self) {
        self.output = None;
        self.reset_view = false;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, config: &MapConfig) {
        let Some(output) = &self.output else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        let title = match &output.selected_state {
            Some(state) => format!("Geo Clustering Dashboard: {}", state),
            None => "Geo Clustering Dashboard".to_string(),
        };
        ui.label(RichText::new(title).size(18.0).strong());
        ui.add_space(8.0);

        let map_height = (ui.available_height() - TABLE_RESERVE).max(MIN_MAP_HEIGHT);
        MapPlotter::draw_map(ui, output, config, map_height, self.reset_view);
        self.reset_view = false;

        ui.add_space(10.0);
        ui.label(RichText::new("Cluster Summary").size(14.0).strong());
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                MapPlotter::draw_summary_table(ui, &output.summary);
            });
    }
}
