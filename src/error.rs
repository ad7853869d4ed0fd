use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Polars error: {0}")]
    Polars(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema mismatch for table {table}: expected columns {expected:?}, got {found:?}")]
    SchemaMismatch {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

impl From<polars::prelude::PolarsError> for PipelineError {
    fn from(e: polars::prelude::PolarsError) -> Self {
        PipelineError::Polars(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
