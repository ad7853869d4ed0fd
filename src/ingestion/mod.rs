//! Ingestion pipeline
//!
//! Streams delimited source files into the table store in bounded-memory
//! chunks:
//! - `reader` turns one file into a lazy sequence of typed row batches
//! - `loader` appends those batches to one table, with progress estimation
//! - `orchestrator` walks a data directory and drives one load per file

pub mod loader;
pub mod orchestrator;
pub mod reader;

pub use loader::ChunkLoader;
pub use orchestrator::IngestionOrchestrator;
pub use reader::{total_chunks, Chunk, CsvSource};

use serde::{Deserialize, Serialize};

/// Outcome of one table's load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub table: String,
    pub rows: u64,
    pub chunks: u64,
    pub elapsed_secs: f64,
}

/// A load that was aborted; chunks appended before the failure stay
/// committed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoadFailure {
    pub table: String,
    pub error: String,
}

/// Report for one orchestrator run across a data directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestReport {
    pub outcomes: Vec<LoadOutcome>,
    pub failures: Vec<LoadFailure>,
    pub total_elapsed_secs: f64,
}
