//! Spreadsheet source for `.xlsx` and `.xls` workbooks.
//!
//! The first worksheet is read; its first row names the columns. Empty and
//! error cells are nulls. A column whose numbers are all integral is read as
//! integers, since spreadsheets store every number as a float.

use super::{ensure_file, DataSource};
use crate::core::{parse_date, Column, Table, Value};
use crate::prelude::*;
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct ExcelSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl ExcelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    /// Reads the named worksheet instead of the first one.
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    fn read_range(&self) -> Result<Range<Data>> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            GuardError::data_source(
                "excel",
                format!("failed to open {}: {e}", self.path.display()),
            )
        })?;

        let sheet = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook.sheet_names().first().cloned().ok_or_else(|| {
                GuardError::data_source("excel", "workbook has no worksheets")
            })?,
        };

        workbook.worksheet_range(&sheet).map_err(|e| {
            GuardError::data_source("excel", format!("failed to read sheet '{sheet}': {e}"))
        })
    }
}

#[async_trait]
impl DataSource for ExcelSource {
    #[instrument(skip(self), fields(source.type = "excel", source.path = %self.path.display()))]
    async fn load(&self) -> Result<Table> {
        ensure_file(&self.path, "excel").await?;

        let source = self.clone();
        let range = tokio::task::spawn_blocking(move || source.read_range())
            .await
            .map_err(|e| GuardError::Internal(format!("spreadsheet reader panicked: {e}")))??;

        debug!(rows = range.height(), columns = range.width(), "Worksheet read");
        range_to_table(&range)
    }

    fn description(&self) -> String {
        format!("Excel workbook: {}", self.path.display())
    }
}

/// Converts a worksheet range with a header row into a table.
pub fn range_to_table(range: &Range<Data>) -> Result<Table> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let names = header_names(header);

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (index, values) in columns.iter_mut().enumerate() {
            values.push(row.get(index).map_or(Value::Null, cell_to_value));
        }
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, narrow_integral(values)))
        .collect();
    Table::new(columns)
}

/// Blank headers become `Unnamed: <index>`; repeated names get a `.N` suffix.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let base = match cell {
                Data::Empty => format!("Unnamed: {index}"),
                other => match cell_to_value(other) {
                    Value::Null => format!("Unnamed: {index}"),
                    value => value.to_string(),
                },
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

/// Maps one spreadsheet cell onto a [`Value`].
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::Float(*f),
        Data::String(s) => Value::Str(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Value::Null, |dt| Value::Date(dt.date())),
        Data::DateTimeIso(s) => parse_date(s).map_or_else(|| Value::Str(s.clone()), Value::Date),
        Data::DurationIso(s) => Value::Str(s.clone()),
    }
}

/// Turns a column of integral floats into integers. Columns holding any
/// fractional number or non-numeric cell are left alone.
fn narrow_integral(values: Vec<Value>) -> Vec<Value> {
    let integral = values.iter().all(|v| match v {
        Value::Null | Value::Int(_) => true,
        Value::Float(f) => f.fract() == 0.0 && f.abs() < 9.0e15,
        _ => false,
    });
    let any_float = values.iter().any(|v| matches!(v, Value::Float(f) if !f.is_nan()));
    if !(integral && any_float) {
        return values;
    }

    values
        .into_iter()
        .map(|v| match v {
            Value::Float(f) => Value::Int(f as i64),
            other => other,
        })
        .collect()
}
