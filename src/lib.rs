pub mod config;
pub mod error;
pub mod ingestion;
pub mod store;
pub mod summary;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
