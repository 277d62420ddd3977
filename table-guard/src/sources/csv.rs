//! CSV file source.

use super::{batches_to_table, ensure_file, path_str, DataSource};
use crate::core::Table;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::{CsvReadOptions, SessionContext};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Options for reading CSV files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Whether the first row holds column names
    pub has_header: bool,
    /// Rows sampled for schema inference
    pub schema_infer_max_records: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            schema_infer_max_records: 1000,
        }
    }
}

/// Reads a CSV file through DataFusion, inferring column types.
///
/// Empty fields are read as nulls.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvOptions,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: CsvOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self), fields(source.type = "csv", source.path = %self.path.display()))]
    async fn load(&self) -> Result<Table> {
        ensure_file(&self.path, "csv").await?;
        let path = path_str(&self.path, "csv")?;
        // DataFusion filters listed files by extension, so match the actual one
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let options = CsvReadOptions::new()
            .has_header(self.options.has_header)
            .delimiter(self.options.delimiter)
            .schema_infer_max_records(self.options.schema_infer_max_records)
            .file_extension(&extension);

        let ctx = SessionContext::new();
        let frame = ctx.read_csv(path, options).await.map_err(|e| {
            GuardError::data_source_with_source("csv", format!("failed to read {path}"), Box::new(e))
        })?;
        let schema = frame.schema().as_arrow().clone();
        let batches = frame.collect().await?;
        debug!(batches = batches.len(), columns = schema.fields().len(), "CSV collected");

        batches_to_table(&schema, &batches)
    }

    fn description(&self) -> String {
        format!("CSV file: {}", self.path.display())
    }
}
