//! Geo Cluster Dashboard
//!
//! Upload a CSV or Excel file of clustered points, pick a state, and inspect
//! per-cluster centroids on an interactive map.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod logging;
pub mod pipeline;
pub mod stats;

pub use pipeline::{run_pipeline, PipelineError, PipelineOutput};
