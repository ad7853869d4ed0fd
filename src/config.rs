//! Pipeline configuration
//!
//! Every component takes its paths and tuning knobs from this struct instead
//! of module-level globals, so multiple isolated runs can coexist in one
//! process (and in tests).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory scanned for `.csv` source files
    pub data_dir: PathBuf,

    /// SQLite database file backing the fact and summary tables
    pub db_path: PathBuf,

    /// Rows per ingestion chunk
    pub chunksize: usize,

    /// Name of the published summary table
    pub summary_table: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            db_path: PathBuf::from("inventory.db"),
            chunksize: 10_000,
            summary_table: "vendor_sales_summary".to_string(),
        }
    }
}
