//! Validation result types.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One reported failure.
///
/// `row` is absent for rule-level problems such as a missing column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub column: String,
    /// Serialized as `error` to keep the report format stable.
    #[serde(rename = "error")]
    pub message: String,
}

impl Violation {
    /// Creates a violation tied to a specific cell.
    pub fn at_row(row: usize, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates a violation that concerns a whole rule or column.
    pub fn for_rule(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row: None,
            column: column.into(),
            message: message.into(),
        }
    }
}

/// Aggregate pass/fail statistics for one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub rows_checked: usize,
    /// Distinct rows that appear in at least one row-level violation.
    pub rows_failed: usize,
    pub validation_passed: bool,
}

impl Summary {
    pub fn from_violations(rows_checked: usize, violations: &[Violation]) -> Self {
        let failed_rows: HashSet<usize> = violations.iter().filter_map(|v| v.row).collect();
        Self {
            rows_checked,
            rows_failed: failed_rows.len(),
            validation_passed: violations.is_empty(),
        }
    }
}

/// The outcome of a validation run: a summary plus every violation in
/// evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    pub errors: Vec<Violation>,
}

impl Report {
    /// Builds a report, deriving the summary from `errors`.
    pub fn new(rows_checked: usize, errors: Vec<Violation>) -> Self {
        Self {
            summary: Summary::from_violations(rows_checked, &errors),
            errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.summary.validation_passed
    }

    /// Violations reported for `column`, in report order.
    pub fn errors_for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.errors.iter().filter(move |v| v.column == column)
    }

    /// Row indices with a violation on `column`, in report order.
    pub fn failed_rows(&self, column: &str) -> Vec<usize> {
        self.errors_for_column(column).filter_map(|v| v.row).collect()
    }
}
