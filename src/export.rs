//! Export of the current selection: enriched rows as CSV, map as PNG.

use crate::charts::{RenderError, StaticMapRenderer};
use crate::config::ExportConfig;
use crate::pipeline::PipelineOutput;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Write the enriched rows (with centroid and size columns) as CSV.
pub fn export_csv(output: &PipelineOutput, path: &Path) -> Result<(), ExportError> {
    let mut df = output.enriched.clone();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    info!(path = %path.display(), rows = df.height(), "exported csv");
    Ok(())
}

/// Render the map of the current selection to PNG.
pub fn export_png(
    output: &PipelineOutput,
    path: &Path,
    config: &ExportConfig,
) -> Result<(), ExportError> {
    StaticMapRenderer::render_png(output, path, config.png_width, config.png_height)?;
    info!(path = %path.display(), "exported png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::run_pipeline;

    #[test]
    fn csv_export_carries_summary_columns() {
        let csv = "State,Latitude,Longitude,cluster\nGoa,15.0,74.0,1\nGoa,15.2,74.2,1\n";
        let output = run_pipeline(csv.as_bytes(), "goa.csv", None).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goa_enriched.csv");
        export_csv(&output, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("State,Latitude,Longitude,cluster,centroid_lat,centroid_lon,cluster_size")
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn png_export_without_points_is_refused() {
        let output =
            run_pipeline(b"State,Latitude,Longitude,cluster\n", "empty.csv", None).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let err = export_png(&output, &dir.path().join("map.png"), &ExportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ExportError::Render(RenderError::NoPoints)));
    }
}
