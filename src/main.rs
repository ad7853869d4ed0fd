use anyhow::Result;
use clap::{Parser, Subcommand};
use inventory_pipeline::ingestion::IngestionOrchestrator;
use inventory_pipeline::store::SqliteStore;
use inventory_pipeline::{summary, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "inventory-pipeline")]
#[command(about = "Chunked CSV ingestion and vendor performance summary")]
struct Args {
    /// SQLite database file
    #[arg(long, default_value = "inventory.db")]
    db: PathBuf,

    /// Directory containing the source CSV files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Rows per ingestion chunk
    #[arg(long, default_value_t = 10_000)]
    chunksize: usize,

    /// Name of the published summary table
    #[arg(long, default_value = "vendor_sales_summary")]
    summary_table: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every CSV in the data directory into the database
    Ingest,
    /// Build and publish the vendor summary from the ingested fact tables
    Summarize,
    /// Ingest, then summarize
    Run,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = PipelineConfig {
        data_dir: args.data_dir,
        db_path: args.db,
        chunksize: args.chunksize,
        summary_table: args.summary_table,
    };

    let mut store = SqliteStore::open(&config.db_path)?;

    match args.command {
        Command::Ingest => {
            ingest(&config, &mut store)?;
        }
        Command::Summarize => {
            summary::run_summary(&mut store, &config.summary_table)?;
        }
        Command::Run => {
            ingest(&config, &mut store)?;
            summary::run_summary(&mut store, &config.summary_table)?;
        }
    }

    Ok(())
}

fn ingest(config: &PipelineConfig, store: &mut SqliteStore) -> Result<()> {
    let orchestrator = IngestionOrchestrator::new(config.clone());
    let report = orchestrator.run(store)?;
    info!(
        "Ingestion report: {}",
        serde_json::to_string_pretty(&report)?
    );
    Ok(())
}
