//! Storage engine contract
//!
//! The pipeline only ever talks to the store through three operations:
//! append a batch of rows to a named table, run a SQL query, and replace a
//! table wholesale. Everything else (schema bookkeeping, transactions,
//! typing) is the store's business.

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use polars::prelude::DataFrame;

/// A single typed cell as produced by the row source reader.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

pub trait TableStore {
    /// Append rows to `table`, creating it from `columns` on first use.
    ///
    /// Appends to an existing table are validated against its stored column
    /// set and fail with `PipelineError::SchemaMismatch` when they differ.
    fn bulk_append(&mut self, table: &str, columns: &[String], rows: &[Vec<Cell>]) -> Result<()>;

    /// Execute a SQL query and materialize the result set as a DataFrame.
    fn execute_query(&self, sql: &str) -> Result<DataFrame>;

    /// Drop `table` if it exists and recreate it from the frame's contents.
    fn replace_table(&mut self, table: &str, df: &DataFrame) -> Result<()>;
}
