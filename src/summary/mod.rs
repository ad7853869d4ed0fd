//! Vendor summary phase
//!
//! query → enrich → publish. The query is fatal on failure; publishing is
//! caught and logged, so a failed overwrite ends the run without a valid
//! summary table but without tearing down the process.

pub mod enrich;
pub mod query;

pub use enrich::enrich;
pub use query::{vendor_summary, VENDOR_SUMMARY_SQL};

use crate::error::Result;
use crate::store::TableStore;
use polars::prelude::DataFrame;
use std::time::Instant;
use tracing::{error, info};

/// Run the full summary phase, publishing into `table`.
///
/// Returns the enriched relation that was (or failed to be) published.
pub fn run_summary(store: &mut dyn TableStore, table: &str) -> Result<DataFrame> {
    let start = Instant::now();

    let summary = vendor_summary(store)?;
    let enriched = enrich(summary)?;

    match store.replace_table(table, &enriched) {
        Ok(()) => info!("✅ {} ingested successfully", table),
        Err(e) => error!("❌ Failed to ingest {}: {}", table, e),
    }

    info!(
        "🎯 Summary completed in {:.2} seconds",
        start.elapsed().as_secs_f64()
    );
    Ok(enriched)
}
