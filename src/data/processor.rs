//! Data Processor Module
//! State normalization, state selection and row filtering.

use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Name of the region column.
pub const STATE_COL: &str = "State";

/// Text used for null states, matching how a missing value stringifies.
const NULL_STATE: &str = "nan";

/// Handles State cleanup and filtering.
pub struct DataProcessor;

impl DataProcessor {
    /// Titlecase each cased character that does not follow another cased
    /// character, lowercase the rest.
    pub fn title_case(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut prev_cased = false;

        for c in s.chars() {
            let cased = c.is_lowercase() || c.is_uppercase();
            if cased && prev_cased {
                out.extend(c.to_lowercase());
            } else if cased {
                Self::push_titlecase(&mut out, c);
            } else {
                out.push(c);
            }
            prev_cased = cased;
        }

        out
    }

    /// Multi-letter uppercase expansions ('ß' -> "SS") keep only their first
    /// letter capitalized, so 'ß' becomes "Ss".
    fn push_titlecase(out: &mut String, c: char) {
        let mut upper = c.to_uppercase();
        if let Some(first) = upper.next() {
            out.push(first);
        }
        for rest in upper {
            out.extend(rest.to_lowercase());
        }
    }

    /// Trim surrounding whitespace, then title-case.
    pub fn normalize_state(raw: &str) -> String {
        Self::title_case(raw.trim())
    }

    /// Replace the State column with its normalized text form.
    pub fn normalize_states(df: &DataFrame) -> PolarsResult<DataFrame> {
        let states = df.column(STATE_COL)?.cast(&DataType::String)?;
        let normalized: Vec<String> = states
            .str()?
            .into_iter()
            .map(|v| Self::normalize_state(v.unwrap_or(NULL_STATE)))
            .collect();

        let mut out = df.clone();
        out.with_column(Column::new(STATE_COL.into(), normalized))?;
        Ok(out)
    }

    /// Distinct states in sorted order.
    pub fn distinct_states(df: &DataFrame) -> PolarsResult<Vec<String>> {
        let states = df.column(STATE_COL)?.cast(&DataType::String)?;
        let unique: BTreeSet<String> = states
            .str()?
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect();
        Ok(unique.into_iter().collect())
    }

    /// Pick the active state: the requested one when available, else the first.
    pub fn resolve_selection(states: &[String], requested: Option<&str>) -> Option<String> {
        if let Some(requested) = requested {
            let requested = Self::normalize_state(requested);
            if states.contains(&requested) {
                return Some(requested);
            }
            warn!(%requested, "selected state not in upload, using first state");
        }
        states.first().cloned()
    }

    /// Filter DataFrame for a single state.
    pub fn filter_by_state(df: &DataFrame, state: &str) -> PolarsResult<DataFrame> {
        let filtered = df
            .clone()
            .lazy()
            .filter(col(STATE_COL).eq(lit(state)))
            .collect()?;
        debug!(state, rows = filtered.height(), "filtered by state");
        Ok(filtered)
    }
}
