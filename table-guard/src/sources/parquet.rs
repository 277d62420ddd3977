//! Parquet file source.

use super::{batches_to_table, ensure_file, path_str, DataSource};
use crate::core::Table;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::{ParquetReadOptions, SessionContext};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Reads a Parquet file through DataFusion.
#[derive(Debug, Clone)]
pub struct ParquetSource {
    path: PathBuf,
}

impl ParquetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for ParquetSource {
    #[instrument(skip(self), fields(source.type = "parquet", source.path = %self.path.display()))]
    async fn load(&self) -> Result<Table> {
        ensure_file(&self.path, "parquet").await?;
        let path = path_str(&self.path, "parquet")?;
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let options = ParquetReadOptions {
            file_extension: &extension,
            ..Default::default()
        };

        let ctx = SessionContext::new();
        let frame = ctx.read_parquet(path, options).await.map_err(|e| {
            GuardError::data_source_with_source(
                "parquet",
                format!("failed to read {path}"),
                Box::new(e),
            )
        })?;
        let schema = frame.schema().as_arrow().clone();
        let batches = frame.collect().await?;
        debug!(batches = batches.len(), columns = schema.fields().len(), "Parquet collected");

        batches_to_table(&schema, &batches)
    }

    fn description(&self) -> String {
        format!("Parquet file: {}", self.path.display())
    }
}
