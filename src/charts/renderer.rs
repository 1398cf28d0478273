//! Static Map Renderer
//! Draws the cluster map to a PNG with plotters.
//!
//! Layout:
//! 1. Caption: "Clusters in {state}"
//! 2. Longitude/Latitude mesh fitted to the points
//! 3. One colored series per cluster, centroids as black crosses
//! 4. Legend in the upper right corner

use crate::charts::{ClusterSeries, MapPlotter, MapViewport};
use crate::pipeline::PipelineOutput;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const POINT_SIZE: i32 = 4;
const CROSS_SIZE: i32 = 7;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw: selection has no located points")]
    NoPoints,
    #[error("Drawing failed: {0}")]
    Draw(String),
}

pub struct StaticMapRenderer;

impl StaticMapRenderer {
    /// Render the current selection to a PNG file.
    pub fn render_png(
        output: &PipelineOutput,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let view = MapViewport::fit(output.points.iter().map(|p| (p.lat, p.lon)))
            .ok_or(RenderError::NoPoints)?;
        let series = MapPlotter::cluster_series(output);
        let title = format!(
            "Clusters in {}",
            output.selected_state.as_deref().unwrap_or("-")
        );

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(view.min[0]..view.max[0], view.min[1]..view.max[1])
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        for ClusterSeries { label, rgb, points } in series {
            let color = RGBColor(rgb.0, rgb.1, rgb.2);
            chart
                .draw_series(
                    points
                        .into_iter()
                        .map(move |[lon, lat]| Circle::new((lon, lat), POINT_SIZE, color.filled())),
                )
                .map_err(|e| RenderError::Draw(e.to_string()))?
                .label(label)
                .legend(move |(x, y)| Circle::new((x, y), POINT_SIZE, color.filled()));
        }

        let centroids: Vec<(f64, f64)> = output
            .summary
            .iter()
            .filter_map(|s| Some((s.centroid_lon?, s.centroid_lat?)))
            .collect();
        if !centroids.is_empty() {
            chart
                .draw_series(
                    centroids
                        .into_iter()
                        .map(|c| Cross::new(c, CROSS_SIZE, BLACK.stroke_width(2))),
                )
                .map_err(|e| RenderError::Draw(e.to_string()))?
                .label("Centroids")
                .legend(|(x, y)| Cross::new((x, y), CROSS_SIZE, BLACK.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        root.present()
            .map_err(|e| RenderError::Draw(e.to_string()))?;
        Ok(())
    }
}
