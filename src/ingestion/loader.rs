//! Chunk loader
//!
//! Appends one source file to one table, chunk by chunk, logging progress
//! with a remaining-time estimate. The first failed append aborts the load;
//! chunks already appended stay committed (no cross-chunk rollback).

use crate::error::Result;
use crate::ingestion::reader::{total_chunks, CsvSource};
use crate::ingestion::LoadOutcome;
use crate::store::TableStore;
use std::time::Instant;
use tracing::info;

pub struct ChunkLoader {
    chunksize: usize,
}

impl ChunkLoader {
    pub fn new(chunksize: usize) -> Self {
        Self { chunksize }
    }

    pub fn load(
        &self,
        source: &CsvSource,
        table: &str,
        store: &mut dyn TableStore,
    ) -> Result<LoadOutcome> {
        let total_rows = source.count_rows()?;
        let estimated_chunks = total_chunks(total_rows, self.chunksize);
        info!(
            "📦 Total rows: {} | chunk size: {} | total chunks: {}",
            total_rows, self.chunksize, estimated_chunks
        );

        let start = Instant::now();
        let chunks = source.chunks(self.chunksize)?;
        let columns = chunks.columns().to_vec();

        let mut rows_appended = 0u64;
        let mut chunks_done = 0u64;
        for chunk in chunks {
            let chunk = chunk?;
            store.bulk_append(table, &columns, &chunk.rows)?;
            rows_appended += chunk.rows.len() as u64;
            chunks_done = chunk.index as u64 + 1;

            let elapsed = start.elapsed().as_secs_f64();
            let avg_per_chunk = elapsed / chunks_done as f64;
            let est_remaining =
                avg_per_chunk * (estimated_chunks as f64 - chunks_done as f64).max(0.0);
            info!(
                "✅ Chunk {}/{} inserted into {} | ⏱ estimated time left: {:.2} seconds",
                chunks_done, estimated_chunks, table, est_remaining
            );
        }

        Ok(LoadOutcome {
            table: table.to_string(),
            rows: rows_appended,
            chunks: chunks_done,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}
