//! In-memory columnar table that rules are evaluated against.

use super::Value;
use crate::prelude::*;
use std::collections::HashSet;

/// A named, ordered sequence of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    /// Creates a column from anything convertible into cell values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use table_guard::core::{Column, Value};
    ///
    /// let ages = Column::new("age", vec![Some(10_i64), None, Some(200)]);
    /// assert_eq!(ages.len(), 3);
    /// assert!(ages.values()[1].is_null());
    /// ```
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the cell at `row`, if the row exists.
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }
}

/// An ordered set of equally long, uniquely named columns.
///
/// Rows are addressed by their 0-based index. The validator only ever reads
/// a table; coercion works on copies of individual columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Table {
    /// Creates a table, rejecting duplicate column names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(GuardError::configuration(format!(
                    "duplicate column '{}' in table",
                    column.name()
                )));
            }
            if column.len() != num_rows {
                return Err(GuardError::configuration(format!(
                    "column '{}' has {} rows, expected {num_rows}",
                    column.name(),
                    column.len()
                )));
            }
        }

        Ok(Self { columns, num_rows })
    }

    /// Appends a column, applying the same checks as [`Table::new`].
    pub fn with_column(self, column: Column) -> Result<Self> {
        let mut columns = self.columns;
        columns.push(column);
        Self::new(columns)
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }
}
