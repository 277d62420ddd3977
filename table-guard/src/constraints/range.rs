//! Range constraint: inclusive min/max bounds over numbers, dates and text.
//!
//! Bounds come from configuration as untyped literals. Before each
//! comparison the bound is cast to the cell's runtime category:
//!
//! | cell          | bound cast                          |
//! |---------------|-------------------------------------|
//! | date          | text parsed as a calendar date      |
//! | int / float   | number, or text parsed as a float   |
//! | string        | used as-is, must itself be text     |
//! | anything else | incomparable                        |

use super::coercion::to_float;
use crate::core::{parse_date, ColumnView, Evaluator, Literal, Value, Violation};
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Which side of the range a bound sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Min,
    Max,
}

/// Reports cells below `min` or above `max`. Both bounds are inclusive.
///
/// Nulls are skipped. When a bound cannot be cast to the cell's category the
/// cell gets a single "incomparable types" violation and no further range
/// checks.
///
/// # Examples
///
/// ```rust
/// use table_guard::constraints::RangeConstraint;
/// use table_guard::core::{Column, ColumnView, Evaluator};
///
/// let ages = Column::new("age", vec![-1_i64, 0, 120, 121]);
/// let violations = RangeConstraint::new(Some(0.into()), Some(120.into()))
///     .evaluate(&ColumnView::new(&ages));
///
/// assert_eq!(violations[0].message, "Value -1 below min 0");
/// assert_eq!(violations[1].message, "Value 121 above max 120");
/// assert_eq!(violations.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RangeConstraint {
    min: Option<Literal>,
    max: Option<Literal>,
}

impl RangeConstraint {
    pub fn new(min: Option<Literal>, max: Option<Literal>) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Option<&Literal> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Literal> {
        self.max.as_ref()
    }

    /// Checks one bound; `Err` means the cell and bound are incomparable.
    fn check_bound(
        row: usize,
        column: &str,
        value: &Value,
        bound: &Literal,
        side: Side,
    ) -> Result<Option<Violation>, Violation> {
        let ordering = compare(value, bound).ok_or_else(|| {
            Violation::at_row(row, column, "Range check failed (incomparable types)")
        })?;

        let violation = match (side, ordering) {
            (Side::Min, Ordering::Less) => Some(Violation::at_row(
                row,
                column,
                format!("Value {value} below min {bound}"),
            )),
            (Side::Max, Ordering::Greater) => Some(Violation::at_row(
                row,
                column,
                format!("Value {value} above max {bound}"),
            )),
            _ => None,
        };
        Ok(violation)
    }
}

impl Evaluator for RangeConstraint {
    fn name(&self) -> &str {
        "range"
    }

    #[instrument(skip(self, column), fields(
        constraint.name = "range",
        constraint.column = %column.name(),
        constraint.min = ?self.min,
        constraint.max = ?self.max
    ))]
    fn evaluate(&self, column: &ColumnView<'_>) -> Vec<Violation> {
        let bounds: Vec<(&Literal, Side)> = [(self.min.as_ref(), Side::Min), (self.max.as_ref(), Side::Max)]
            .into_iter()
            .filter_map(|(bound, side)| bound.map(|b| (b, side)))
            .collect();

        let mut violations = Vec::new();
        for (row, value) in column.values().iter().enumerate() {
            if value.is_null() {
                continue;
            }
            for (bound, side) in &bounds {
                match Self::check_bound(row, column.name(), value, bound, *side) {
                    Ok(Some(violation)) => violations.push(violation),
                    Ok(None) => {}
                    Err(incomparable) => {
                        debug!(
                            data.row = row,
                            value.kind = value.kind(),
                            bound = %bound,
                            "Range bound is incomparable with value"
                        );
                        violations.push(incomparable);
                        break;
                    }
                }
            }
        }

        debug!(result.violations = violations.len(), "Evaluated range");
        violations
    }

    fn description(&self) -> Option<String> {
        let fmt = |b: Option<&Literal>| b.map_or_else(|| "-".to_string(), ToString::to_string);
        Some(format!(
            "Checks that values lie within [{}, {}]",
            fmt(self.min.as_ref()),
            fmt(self.max.as_ref())
        ))
    }
}

/// Orders a cell against a bound cast to the cell's category.
///
/// Returns `None` when the cast fails or the category has no ordering.
pub fn compare(value: &Value, bound: &Literal) -> Option<Ordering> {
    match value {
        Value::Date(date) => bound_as_date(bound).map(|b| date.cmp(&b)),
        Value::Int(i) => match bound {
            Literal::Int(b) => Some(i.cmp(b)),
            _ => (*i as f64).partial_cmp(&bound_as_float(bound)?),
        },
        Value::Float(_) => to_float(value)?.partial_cmp(&bound_as_float(bound)?),
        Value::Str(text) => match bound {
            Literal::Str(b) => Some(text.as_str().cmp(b.as_str())),
            _ => None,
        },
        Value::Bool(_) | Value::Null => None,
    }
}

fn bound_as_float(bound: &Literal) -> Option<f64> {
    match bound {
        Literal::Int(i) => Some(*i as f64),
        Literal::Float(f) => Some(*f),
        Literal::Str(s) => s.trim().parse::<f64>().ok(),
        Literal::Bool(_) => None,
    }
}

fn bound_as_date(bound: &Literal) -> Option<NaiveDate> {
    match bound {
        Literal::Str(s) => parse_date(s),
        _ => None,
    }
}
