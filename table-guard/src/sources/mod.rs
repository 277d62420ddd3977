//! Dataset loaders for table-guard.
//!
//! CSV and Parquet files are read through DataFusion and converted from Arrow
//! record batches into a [`Table`]. JSON files are parsed with `serde_json`
//! directly, since they may be an array of records, a column-oriented object,
//! or newline-delimited records. Spreadsheets are read with `calamine`.

use crate::core::Table;
use crate::prelude::*;
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

mod convert;
mod csv;
mod excel;
mod json;
mod parquet;

pub use convert::{array_values, batches_to_table};
pub use csv::{CsvOptions, CsvSource};
pub use excel::{cell_to_value, range_to_table, ExcelSource};
pub use json::{parse_json_table, JsonOptions, JsonSource};
pub use parquet::ParquetSource;

/// A source that can be materialized into a [`Table`].
///
/// # Examples
///
/// ```rust,no_run
/// use table_guard::sources::{CsvSource, DataSource};
///
/// # async fn example() -> table_guard::prelude::Result<()> {
/// let table = CsvSource::new("data/users.csv").load().await?;
/// println!("{} rows", table.num_rows());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Reads the whole source into memory.
    async fn load(&self) -> Result<Table>;

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;
}

/// File formats recognised by [`load_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
    /// Newline-delimited JSON records
    JsonLines,
    Parquet,
    /// `.xlsx`, `.xlsm` or legacy `.xls` workbooks
    Excel,
}

impl DataFormat {
    /// Detects the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::JsonLines),
            "parquet" => Ok(Self::Parquet),
            "xlsx" | "xlsm" | "xls" => Ok(Self::Excel),
            _ => Err(GuardError::UnsupportedFormat { extension }),
        }
    }

    /// Builds the source that reads `path` in this format.
    pub fn source(self, path: impl Into<PathBuf>) -> Box<dyn DataSource> {
        match self {
            Self::Csv => Box::new(CsvSource::new(path)),
            Self::Json => Box::new(JsonSource::new(path)),
            Self::JsonLines => {
                Box::new(JsonSource::new(path).with_options(JsonOptions { lines: true }))
            }
            Self::Parquet => Box::new(ParquetSource::new(path)),
            Self::Excel => Box::new(ExcelSource::new(path)),
        }
    }
}

/// Loads a dataset, choosing the reader from the file extension.
///
/// Fails with [`GuardError::UnsupportedFormat`] before touching the file
/// when the extension is not one of `.csv`, `.json`, `.jsonl`, `.ndjson`,
/// `.parquet`, `.xlsx`, `.xlsm` or `.xls`.
#[instrument(fields(source.path = %path.as_ref().display()))]
pub async fn load_table(path: impl AsRef<Path> + Debug) -> Result<Table> {
    let path = path.as_ref();
    let format = DataFormat::from_path(path)?;
    let source = format.source(path);

    let table = source.load().await?;
    info!(
        source = %source.description(),
        table.rows = table.num_rows(),
        table.columns = table.num_columns(),
        "Dataset loaded"
    );
    Ok(table)
}

/// Fails unless `path` names an existing regular file.
///
/// DataFusion treats a missing path as an empty listing and would return an
/// empty table, so readers backed by it check first.
pub(crate) async fn ensure_file(path: &Path, source_type: &str) -> Result<()> {
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(GuardError::data_source(
            source_type,
            format!("not a regular file: {}", path.display()),
        ));
    }
    Ok(())
}

/// Returns the path as UTF-8, which DataFusion requires.
pub(crate) fn path_str<'a>(path: &'a Path, source_type: &str) -> Result<&'a str> {
    path.to_str().ok_or_else(|| {
        GuardError::data_source(
            source_type,
            format!("path is not valid UTF-8: {}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        let cases = [
            ("data.csv", DataFormat::Csv),
            ("DATA.CSV", DataFormat::Csv),
            ("dir/records.json", DataFormat::Json),
            ("events.jsonl", DataFormat::JsonLines),
            ("events.NDJSON", DataFormat::JsonLines),
            ("table.parquet", DataFormat::Parquet),
            ("sheet.xlsx", DataFormat::Excel),
            ("legacy.XLS", DataFormat::Excel),
        ];
        for (path, expected) in cases {
            assert_eq!(DataFormat::from_path(Path::new(path)).unwrap(), expected);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        for path in ["notes.txt", "archive.csv.gz", "no_extension"] {
            let err = DataFormat::from_path(Path::new(path)).unwrap_err();
            assert!(matches!(err, GuardError::UnsupportedFormat { .. }), "{path}");
        }
    }

    #[tokio::test]
    async fn test_load_table_rejects_before_reading() {
        // the file does not exist; the extension check must fail first
        let err = load_table("missing/report.txt").await.unwrap_err();
        match err {
            GuardError::UnsupportedFormat { extension } => assert_eq!(extension, "txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_ensure_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.csv");
        std::fs::write(&file, "id\n1\n").unwrap();

        assert!(ensure_file(&file, "csv").await.is_ok());
        assert!(matches!(
            ensure_file(&dir.path().join("missing.csv"), "csv").await,
            Err(GuardError::Io(_))
        ));
        assert!(matches!(
            ensure_file(dir.path(), "csv").await,
            Err(GuardError::DataSource { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_table_missing_files_fail() {
        for path in [
            "/nonexistent/data.csv",
            "/nonexistent/data.parquet",
            "/nonexistent/data.xlsx",
        ] {
            let err = load_table(path).await.unwrap_err();
            assert!(matches!(err, GuardError::Io(_)), "{path}: {err}");
        }
    }
}
