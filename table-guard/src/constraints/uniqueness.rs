//! Uniqueness constraint: flags every row that shares its value with another.

use crate::core::{ColumnView, Evaluator, Value, Violation};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Hashable grouping key for a raw cell.
///
/// Keys are typed: `Int(1)` and `Str("1")` are different values. All nulls,
/// NaN included, share one key, so repeated nulls count as duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(&'a str),
    Date(NaiveDate),
}

impl<'a> From<&'a Value> for GroupKey<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            _ if value.is_null() => GroupKey::Null,
            Value::Null => GroupKey::Null,
            Value::Bool(b) => GroupKey::Bool(*b),
            Value::Int(i) => GroupKey::Int(*i),
            // -0.0 and 0.0 compare equal, so they must share a key
            Value::Float(f) if *f == 0.0 => GroupKey::Float(0.0_f64.to_bits()),
            Value::Float(f) => GroupKey::Float(f.to_bits()),
            Value::Str(s) => GroupKey::Str(s),
            Value::Date(d) => GroupKey::Date(*d),
        }
    }
}

/// Reports all rows whose raw value occurs more than once.
///
/// Grouping uses the raw column, not the coerced one, so `"1"` and `"01"`
/// stay distinct even under an `int` rule. Every participant of a duplicate
/// group is reported, not only the second and later occurrences.
///
/// # Examples
///
/// ```rust
/// use table_guard::constraints::UniquenessConstraint;
/// use table_guard::core::{Column, ColumnView, Evaluator};
///
/// let ids = Column::new("id", vec![1_i64, 2, 2, 3]);
/// let rows: Vec<_> = UniquenessConstraint::new()
///     .evaluate(&ColumnView::new(&ids))
///     .into_iter()
///     .filter_map(|v| v.row)
///     .collect();
/// assert_eq!(rows, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniquenessConstraint;

impl UniquenessConstraint {
    pub fn new() -> Self {
        Self
    }

    /// Rows belonging to a group of two or more equal raw values, ascending.
    pub fn duplicate_rows(values: &[Value]) -> Vec<usize> {
        let mut groups: HashMap<GroupKey<'_>, Vec<usize>> = HashMap::new();
        for (row, value) in values.iter().enumerate() {
            groups.entry(GroupKey::from(value)).or_default().push(row);
        }

        let mut rows: Vec<usize> = groups
            .into_values()
            .filter(|rows| rows.len() > 1)
            .flatten()
            .collect();
        rows.sort_unstable();
        rows
    }
}

impl Evaluator for UniquenessConstraint {
    fn name(&self) -> &str {
        "uniqueness"
    }

    #[instrument(skip(self, column), fields(constraint.name = "uniqueness", constraint.column = %column.name()))]
    fn evaluate(&self, column: &ColumnView<'_>) -> Vec<Violation> {
        let rows = Self::duplicate_rows(column.raw());
        debug!(result.duplicate_rows = rows.len(), "Evaluated uniqueness");

        rows.into_iter()
            .map(|row| Violation::at_row(row, column.name(), "Duplicate value found"))
            .collect()
    }

    fn description(&self) -> Option<String> {
        Some("Checks that every raw value occurs once".to_string())
    }
}
