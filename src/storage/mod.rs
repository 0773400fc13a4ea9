use anyhow::Result;
use async_trait::async_trait;

use crate::models::FinalDataset;

mod json;
pub use json::JsonStorage;

/// Receives the finished, sorted dataset of one term.
#[async_trait]
pub trait DatasetSink: Send + Sync {
    async fn persist(&self, dataset: &FinalDataset) -> Result<()>;
}
