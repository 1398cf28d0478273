//! Data module - upload loading, validation and state processing

mod loader;
mod processor;
mod validator;

pub use loader::{DataLoader, FileFormat, LoaderError};
pub use processor::{DataProcessor, STATE_COL};
pub use validator::{validate_columns, ValidationError, REQUIRED_COLUMNS};
