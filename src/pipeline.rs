//! Upload-to-map pipeline.
//!
//! Loader -> validator -> state normalization and filter -> cluster
//! aggregation. Every call recomputes everything from its arguments.

use crate::data::{validate_columns, DataLoader, DataProcessor, LoaderError, ValidationError};
use crate::stats::{ClusterKey, ClusterRows, ClusterStatsCalculator, ClusterSummary, Metrics};
use polars::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Ingestion(#[from] LoaderError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Processing failed: {0}")]
    Processing(#[from] PolarsError),
}

/// A plotted row.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub cluster: Option<ClusterKey>,
    pub lat: f64,
    pub lon: f64,
}

/// Everything the dashboard shows for one upload and state selection.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Selectable states, normalized and sorted.
    pub states: Vec<String>,
    /// None only when the upload has no rows.
    pub selected_state: Option<String>,
    pub metrics: Metrics,
    pub summary: Vec<ClusterSummary>,
    /// Filtered rows plus `centroid_lat`, `centroid_lon`, `cluster_size`.
    pub enriched: DataFrame,
    pub points: Vec<MapPoint>,
    /// Mean (lat, lon) of the filtered rows.
    pub center: Option<(f64, f64)>,
    /// Coordinates outside the valid latitude/longitude ranges. Still plotted.
    pub out_of_range: usize,
}

/// Run the whole pipeline with default loader settings.
pub fn run_pipeline(
    file_bytes: &[u8],
    filename: &str,
    selected_state: Option<&str>,
) -> Result<PipelineOutput, PipelineError> {
    run_pipeline_with(&DataLoader::default(), file_bytes, filename, selected_state)
}

pub fn run_pipeline_with(
    loader: &DataLoader,
    file_bytes: &[u8],
    filename: &str,
    selected_state: Option<&str>,
) -> Result<PipelineOutput, PipelineError> {
    let table = loader.load_bytes(file_bytes, filename)?;
    let table = validate_columns(table)?;
    process_table(&table, selected_state)
}

/// Normalize, filter and aggregate an already validated table.
pub fn process_table(
    table: &DataFrame,
    selected_state: Option<&str>,
) -> Result<PipelineOutput, PipelineError> {
    let table = DataProcessor::normalize_states(table)?;
    let states = DataProcessor::distinct_states(&table)?;
    let selected_state = DataProcessor::resolve_selection(&states, selected_state);

    let subset = match &selected_state {
        Some(state) => DataProcessor::filter_by_state(&table, state)?,
        None => table.clear(),
    };

    let rows = ClusterRows::extract(&subset)?;
    let metrics = ClusterStatsCalculator::metrics(&rows);
    let summary = ClusterStatsCalculator::compute_summary(&rows);
    let enriched = ClusterStatsCalculator::enrich(&subset, &rows, &summary)?;
    let center = ClusterStatsCalculator::map_center(&rows);
    let out_of_range = ClusterStatsCalculator::count_out_of_range(&rows);

    let points = rows
        .located()
        .map(|(cluster, lat, lon)| MapPoint {
            cluster: cluster.cloned(),
            lat,
            lon,
        })
        .collect();

    info!(
        state = selected_state.as_deref().unwrap_or("-"),
        points = metrics.total_points,
        clusters = metrics.cluster_count,
        "pipeline complete"
    );

    Ok(PipelineOutput {
        states,
        selected_state,
        metrics,
        summary,
        enriched,
        points,
        center,
        out_of_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "State,Latitude,Longitude,cluster\n\
                       Goa,15.4,73.9,1\n\
                       kerala,10.0,76.3,1\n\
                       KERALA ,10.2,76.5,2\n";

    #[test]
    fn defaults_to_first_sorted_state() {
        let out = run_pipeline(CSV.as_bytes(), "points.csv", None).unwrap();
        assert_eq!(out.states, ["Goa", "Kerala"]);
        assert_eq!(out.selected_state.as_deref(), Some("Goa"));
        assert_eq!(out.metrics.total_points, 1);
        assert_eq!(out.points.len(), 1);
    }

    #[test]
    fn selection_change_rescopes_summary() {
        let out = run_pipeline(CSV.as_bytes(), "points.csv", Some("Kerala")).unwrap();
        assert_eq!(out.metrics.total_points, 2);
        assert_eq!(out.metrics.cluster_count, 2);
        assert_eq!(out.summary.len(), 2);
        assert_eq!(out.enriched.height(), 2);
    }

    #[test]
    fn header_only_upload_is_degenerate_not_an_error() {
        let out = run_pipeline(b"State,Latitude,Longitude,cluster\n", "empty.csv", None).unwrap();
        assert!(out.states.is_empty());
        assert_eq!(out.selected_state, None);
        assert_eq!(out.metrics, Metrics::default());
        assert!(out.summary.is_empty());
        assert_eq!(out.center, None);
    }

    #[test]
    fn out_of_range_coordinates_are_reported_and_kept() {
        let csv = "State,Latitude,Longitude,cluster\n\
                   Goa,15.4,73.9,1\n\
                   Goa,95.0,200.0,1\n";
        let out = run_pipeline(csv.as_bytes(), "points.csv", None).unwrap();
        assert_eq!(out.out_of_range, 2);
        assert_eq!(out.points.len(), 2);

        let clean = run_pipeline(CSV.as_bytes(), "points.csv", Some("Kerala")).unwrap();
        assert_eq!(clean.out_of_range, 0);
    }

    #[test]
    fn missing_columns_stop_the_pipeline() {
        let csv = "State,Latitude,Longitude\nGoa,15.4,73.9\n";
        let err = run_pipeline(csv.as_bytes(), "points.csv", None).unwrap_err();
        match err {
            PipelineError::Validation(e) => assert_eq!(e.missing, ["cluster"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
