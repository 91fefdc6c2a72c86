//! Error taxonomy for the dashboard core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Everything here is unrecoverable at the point raised; the caller surfaces
/// the error and lets the user restart the interaction.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Network or HTTP failure fetching the dataset. Fatal at startup.
    #[error("failed to fetch dataset: {0}")]
    SourceFetch(#[from] reqwest::Error),

    /// The byte blob is not a readable columnar table, or a declared column
    /// is missing from its schema.
    #[error("unreadable columnar source: {0}")]
    SourceFormat(String),

    /// A sequence-valued cell did not parse as a flat list of strings.
    /// Fails the whole load: silent row loss is worse than a hard stop.
    #[error("column {column}: cell {cell:?} is not a list of strings")]
    MalformedListCell { column: String, cell: String },

    /// No row in the selected MSA has a usable salary upper bound, so no
    /// sensible salary-range control exists.
    #[error("no posting in {0:?} carries a salary upper bound")]
    EmptySalaryDomain(String),

    #[error("csv export failed: {0}")]
    Export(#[from] csv::Error),
}

impl From<parquet::errors::ParquetError> for DashboardError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        DashboardError::SourceFormat(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for DashboardError {
    fn from(err: arrow::error::ArrowError) -> Self {
        DashboardError::SourceFormat(err.to_string())
    }
}
