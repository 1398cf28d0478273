//! Upload Loader Module
//! Parses uploaded CSV or Excel bytes into a Polars DataFrame.

use crate::config::LoaderConfig;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx, XlsxError};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to load spreadsheet: {0}")]
    Spreadsheet(#[from] XlsxError),
    #[error("Failed to build table from worksheet: {0}")]
    Sheet(PolarsError),
    #[error("Spreadsheet has no worksheets")]
    NoWorksheet,
}

/// Upload format, chosen by filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// `.csv` (any case) is CSV, everything else is treated as a workbook.
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_ascii_lowercase().ends_with(".csv") {
            FileFormat::Csv
        } else {
            FileFormat::Xlsx
        }
    }
}

/// Handles upload parsing.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    config: LoaderConfig,
}

impl DataLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Parse an uploaded file. Column names come from the header row.
    pub fn load_bytes(&self, bytes: &[u8], filename: &str) -> Result<DataFrame, LoaderError> {
        let format = FileFormat::from_filename(filename);
        debug!(filename, ?format, size = bytes.len(), "parsing upload");

        let df = match format {
            FileFormat::Csv => self.load_csv(bytes)?,
            FileFormat::Xlsx => Self::load_xlsx(bytes)?,
        };

        info!(
            filename,
            rows = df.height(),
            columns = df.width(),
            "loaded upload"
        );
        Ok(df)
    }

    fn load_csv(&self, bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.config.infer_schema_length))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;
        Ok(df)
    }

    /// Read the first worksheet of an .xlsx workbook. An empty sheet gives
    /// an empty table.
    fn load_xlsx(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::NoWorksheet)??;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            debug!("first worksheet is empty");
            return Ok(DataFrame::empty());
        };
        let body: Vec<&[Data]> = rows.collect();

        let columns = Self::header_names(header)
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&Data> = body.iter().map(|row| &row[idx]).collect();
                Self::build_column(name, &cells)
            })
            .collect();

        DataFrame::new(columns).map_err(LoaderError::Sheet)
    }

    /// Blank headers become `Unnamed: {idx}`; repeats get `.1`, `.2`, ...
    fn header_names(header: &[Data]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(header.len());

        for (idx, cell) in header.iter().enumerate() {
            let raw = match cell {
                Data::Empty => format!("Unnamed: {}", idx),
                other => other.to_string(),
            };

            let mut name = raw.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{}.{}", raw, suffix);
                suffix += 1;
            }
            seen.insert(name.clone());
            names.push(name);
        }

        names
    }

    /// Numeric columns become Int64 (all integral) or Float64; anything else is text.
    fn build_column(name: &str, cells: &[&Data]) -> Column {
        let numbers: Option<Vec<Option<f64>>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Empty => Some(None),
                Data::Int(v) => Some(Some(*v as f64)),
                Data::Float(v) => Some(Some(*v)),
                _ => None,
            })
            .collect();

        match numbers {
            Some(values) if values.iter().flatten().all(|v| v.fract() == 0.0) => {
                let ints: Vec<Option<i64>> =
                    values.iter().map(|v| v.map(|f| f as i64)).collect();
                Column::new(name.into(), ints)
            }
            Some(values) => Column::new(name.into(), values),
            None => {
                let texts: Vec<Option<String>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Data::Empty => None,
                        other => Some(other.to_string()),
                    })
                    .collect();
                Column::new(name.into(), texts)
            }
        }
    }
}
