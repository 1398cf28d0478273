//! Column validation for uploaded tables.

use polars::prelude::*;
use thiserror::Error;
use tracing::warn;

/// Columns every upload must carry, matched case-sensitively.
pub const REQUIRED_COLUMNS: [&str; 4] = ["State", "Latitude", "Longitude", "cluster"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Uploaded file does not contain required columns. Missing: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Missing names, in `REQUIRED_COLUMNS` order.
    pub missing: Vec<String>,
}

/// Pass the table through when all required columns are present.
pub fn validate_columns(df: DataFrame) -> Result<DataFrame, ValidationError> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.iter().any(|name| name == *required))
        .map(|s| s.to_string())
        .collect();

    if missing.is_empty() {
        Ok(df)
    } else {
        warn!(?missing, "upload rejected");
        Err(ValidationError { missing })
    }
}
