//! Ingestion orchestrator
//!
//! Walks the data directory, derives a table name per `.csv` file and drives
//! the chunk loader. A failed file is logged and recorded; the remaining
//! files still run. Files are processed sequentially, in directory
//! enumeration order.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::ingestion::loader::ChunkLoader;
use crate::ingestion::reader::CsvSource;
use crate::ingestion::{IngestReport, LoadFailure, LoadOutcome};
use crate::store::TableStore;
use std::time::Instant;
use tracing::{error, info};

pub struct IngestionOrchestrator {
    config: PipelineConfig,
    loader: ChunkLoader,
}

impl IngestionOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        let loader = ChunkLoader::new(config.chunksize);
        Self { config, loader }
    }

    pub fn run(&self, store: &mut dyn TableStore) -> Result<IngestReport> {
        let start = Instant::now();
        info!("📁 Checking files in: {}", self.config.data_dir.display());

        let mut outcomes: Vec<LoadOutcome> = Vec::new();
        let mut failures: Vec<LoadFailure> = Vec::new();

        for entry in std::fs::read_dir(&self.config.data_dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(table) = file_name.strip_suffix(".csv") else {
                continue;
            };

            info!("🚀 Processing: {}", file_name);
            let source = CsvSource::new(entry.path());
            match self.loader.load(&source, table, store) {
                Ok(outcome) => {
                    info!("{} ingested into {}", file_name, table);
                    outcomes.push(outcome);
                }
                Err(e) => {
                    error!("❌ Error ingesting {}: {}", table, e);
                    failures.push(LoadFailure {
                        table: table.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let total_elapsed_secs = start.elapsed().as_secs_f64();
        info!(
            "🎉 All files processed in {:.2} minutes",
            total_elapsed_secs / 60.0
        );

        Ok(IngestReport {
            outcomes,
            failures,
            total_elapsed_secs,
        })
    }
}
