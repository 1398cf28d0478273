//! Map Plotter Module
//! Interactive cluster map and summary table using egui_plot.

use crate::charts::MapViewport;
use crate::config::MapConfig;
use crate::pipeline::PipelineOutput;
use crate::stats::{ClusterKey, ClusterSummary};
use egui::{Color32, RichText};
use egui_plot::{Legend, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points};
use std::collections::{BTreeMap, HashMap};

/// Color palette for clusters, in RGB.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (231, 76, 60),  // Red
    (52, 152, 219), // Blue
    (46, 204, 113), // Green
    (155, 89, 182), // Purple
    (243, 156, 18), // Orange
    (26, 188, 156), // Teal
    (233, 30, 99),  // Pink
    (0, 188, 212),  // Cyan
    (121, 85, 72),  // Brown
    (96, 125, 139), // Blue Grey
];

/// Rows without a cluster label.
pub const UNCLUSTERED_COLOR: (u8, u8, u8) = (149, 165, 166);

const CENTROID_SERIES: &str = "Centroids";

/// Points of one cluster, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSeries {
    pub label: String,
    pub rgb: (u8, u8, u8),
    /// (lon, lat) pairs.
    pub points: Vec<[f64; 2]>,
}

/// Creates the map view and the cluster table.
pub struct MapPlotter;

impl MapPlotter {
    /// Legend / series name of a cluster.
    pub fn cluster_label(key: Option<&ClusterKey>) -> String {
        match key {
            Some(key) => format!("Cluster {}", key),
            None => "No cluster".to_string(),
        }
    }

    /// Color of the cluster at `idx` in summary order.
    pub fn cluster_rgb(idx: usize) -> (u8, u8, u8) {
        PALETTE[idx % PALETTE.len()]
    }

    /// One series per cluster in key order, colored like the summary table; unlabelled rows last.
    pub fn cluster_series(output: &PipelineOutput) -> Vec<ClusterSeries> {
        let mut grouped: BTreeMap<Option<&ClusterKey>, Vec<[f64; 2]>> = BTreeMap::new();
        for point in &output.points {
            grouped
                .entry(point.cluster.as_ref())
                .or_default()
                .push([point.lon, point.lat]);
        }

        let unclustered = grouped.remove(&None);
        let mut series: Vec<ClusterSeries> = grouped
            .into_iter()
            .map(|(key, points)| ClusterSeries {
                label: Self::cluster_label(key),
                rgb: key
                    .and_then(|k| output.summary.iter().position(|s| &s.cluster == k))
                    .map(Self::cluster_rgb)
                    .unwrap_or(UNCLUSTERED_COLOR),
                points,
            })
            .collect();

        if let Some(points) = unclustered {
            series.push(ClusterSeries {
                label: Self::cluster_label(None),
                rgb: UNCLUSTERED_COLOR,
                points,
            });
        }
        series
    }

    /// Hover text for a point of the named series.
    pub fn tooltip_text(summary: Option<&ClusterSummary>, point: &PlotPoint) -> String {
        let position = format!("Latitude: {:.4}\nLongitude: {:.4}", point.y, point.x);
        match summary {
            Some(s) => format!(
                "cluster: {}\ncluster_size: {}\ncentroid_lat: {}\ncentroid_lon: {}\n{}",
                s.cluster,
                s.cluster_size,
                Self::format_coord(s.centroid_lat),
                Self::format_coord(s.centroid_lon),
                position
            ),
            None => position,
        }
    }

    pub fn format_coord(value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.4}", v))
            .unwrap_or_else(|| "-".to_string())
    }

    /// Draw the cluster map. `reset_view` re-centers it at the configured zoom.
    pub fn draw_map(
        ui: &mut egui::Ui,
        output: &PipelineOutput,
        config: &MapConfig,
        height: f32,
        reset_view: bool,
    ) {
        let tooltips: HashMap<String, ClusterSummary> = output
            .summary
            .iter()
            .map(|s| (Self::cluster_label(Some(&s.cluster)), s.clone()))
            .collect();

        let viewport = output
            .center
            .map(|center| MapViewport::centered(center, config.zoom, ui.available_width(), height));
        let series = Self::cluster_series(output);
        let centroids: Vec<[f64; 2]> = output
            .summary
            .iter()
            .filter_map(|s| Some([s.centroid_lon?, s.centroid_lat?]))
            .collect();
        let radius = config.point_radius;

        Plot::new("cluster_map")
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .label_formatter(move |name, value| Self::tooltip_text(tooltips.get(name), value))
            .show(ui, |plot_ui| {
                if reset_view {
                    if let Some(view) = viewport {
                        plot_ui.set_plot_bounds(PlotBounds::from_min_max(view.min, view.max));
                    }
                }

                for s in series {
                    let (r, g, b) = s.rgb;
                    plot_ui.points(
                        Points::new(s.points.into_iter().collect::<PlotPoints>())
                            .radius(radius)
                            .color(Color32::from_rgb(r, g, b))
                            .name(s.label),
                    );
                }

                if !centroids.is_empty() {
                    plot_ui.points(
                        Points::new(centroids.iter().copied().collect::<PlotPoints>())
                            .shape(MarkerShape::Cross)
                            .radius(radius * 1.5)
                            .color(Color32::BLACK)
                            .name(CENTROID_SERIES),
                    );
                }
            });
    }

    /// Draw the cluster summary table.
    pub fn draw_summary_table(ui: &mut egui::Ui, summary: &[ClusterSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("cluster_summary_table")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").size(11.0));
                        ui.label(RichText::new("cluster").strong().size(11.0));
                        ui.label(RichText::new("centroid_lat").strong().size(11.0));
                        ui.label(RichText::new("centroid_lon").strong().size(11.0));
                        ui.label(RichText::new("cluster_size").strong().size(11.0));
                        ui.end_row();

                        for (idx, s) in summary.iter().enumerate() {
                            let (r, g, b) = Self::cluster_rgb(idx);
                            let (rect, _) = ui
                                .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                            ui.painter()
                                .rect_filled(rect, 3.0, Color32::from_rgb(r, g, b));

                            ui.label(RichText::new(s.cluster.to_string()).size(11.0));
                            ui.label(RichText::new(Self::format_coord(s.centroid_lat)).size(11.0));
                            ui.label(RichText::new(Self::format_coord(s.centroid_lon)).size(11.0));
                            ui.label(RichText::new(s.cluster_size.to_string()).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::process_table;
    use polars::prelude::*;

    fn output() -> PipelineOutput {
        let df = DataFrame::new(vec![
            Column::new("State".into(), vec!["Goa"; 4]),
            Column::new("Latitude".into(), vec![15.0, 15.2, 15.4, 15.6]),
            Column::new("Longitude".into(), vec![73.8, 73.9, 74.0, 74.1]),
            Column::new("cluster".into(), vec![Some(3i64), Some(1), Some(3), None]),
        ])
        .unwrap();
        process_table(&df, None).unwrap()
    }

    #[test]
    fn series_follow_cluster_order_with_unlabelled_last() {
        let series = MapPlotter::cluster_series(&output());
        let labels: Vec<&str> = series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Cluster 1", "Cluster 3", "No cluster"]);
        assert_eq!(series[0].rgb, PALETTE[0]);
        assert_eq!(series[1].points, vec![[73.8, 15.0], [74.0, 15.4]]);
        assert_eq!(series[2].rgb, UNCLUSTERED_COLOR);
    }

    #[test]
    fn tooltip_lists_cluster_fields() {
        let out = output();
        let text = MapPlotter::tooltip_text(out.summary.last(), &PlotPoint::new(73.8, 15.0));
        assert_eq!(
            text,
            "cluster: 3\ncluster_size: 2\ncentroid_lat: 15.2000\ncentroid_lon: 73.9000\n\
             Latitude: 15.0000\nLongitude: 73.8000"
        );
    }

    #[test]
    fn tooltip_without_cluster_shows_position_only() {
        let text = MapPlotter::tooltip_text(None, &PlotPoint::new(1.0, 2.0));
        assert_eq!(text, "Latitude: 2.0000\nLongitude: 1.0000");
    }
}
