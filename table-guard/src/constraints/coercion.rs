//! Type coercion of raw columns to a rule's logical type.
//!
//! Coercion is best effort and never fails as a whole: each cell either
//! converts or becomes null. A cell that was non-null before and null after
//! is a coercion failure and is reported as a type mismatch. Null cells never
//! count as failures; reporting them is the not-null check's job.

use crate::core::{parse_date, ColumnView, Evaluator, LogicalType, Value, Violation};
use tracing::{debug, instrument};

/// A coerced copy of a column plus its per-row failure mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub values: Vec<Value>,
    /// `failures[i]` is true iff row `i` was non-null and became null.
    pub failures: Vec<bool>,
}

impl Coerced {
    /// Rows whose value could not be converted, in ascending order.
    pub fn failed_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.failures
            .iter()
            .enumerate()
            .filter_map(|(row, failed)| failed.then_some(row))
    }

    pub fn failure_count(&self) -> usize {
        self.failures.iter().filter(|f| **f).count()
    }
}

/// Converts every cell of `values` to `target`.
pub fn coerce(values: &[Value], target: LogicalType) -> Coerced {
    let coerced: Vec<Value> = values.iter().map(|v| coerce_value(v, target)).collect();
    let failures = values
        .iter()
        .zip(&coerced)
        .map(|(raw, converted)| !raw.is_null() && converted.is_null())
        .collect();

    Coerced {
        values: coerced,
        failures,
    }
}

/// Converts a single cell, yielding `Value::Null` when it cannot be converted.
pub fn coerce_value(value: &Value, target: LogicalType) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    match target {
        LogicalType::Int => to_int(value).map_or(Value::Null, Value::Int),
        LogicalType::Float => to_float(value)
            .filter(|f| !f.is_nan())
            .map_or(Value::Null, Value::Float),
        LogicalType::String => Value::Str(value.to_string()),
        LogicalType::Date => to_date(value).map_or(Value::Null, Value::Date),
    }
}

fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) => integral(*f),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Str(s) => {
            let text = s.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        Value::Date(_) | Value::Null => None,
    }
}

/// Returns the float as an integer only if it has no fractional part.
fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub(crate) fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => s.trim().parse::<f64>().ok(),
        Value::Date(_) | Value::Null => None,
    }
}

fn to_date(value: &Value) -> Option<chrono::NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Str(s) => parse_date(s),
        _ => None,
    }
}

/// Coerces a column to a logical type and reports every cell that failed.
///
/// # Examples
///
/// ```rust
/// use table_guard::constraints::DataTypeConstraint;
/// use table_guard::core::{Column, ColumnView, Evaluator, LogicalType};
///
/// let column = Column::new("age", vec!["10", "ten", "12.5"]);
/// let violations = DataTypeConstraint::new(LogicalType::Int).evaluate(&ColumnView::new(&column));
/// assert_eq!(violations.len(), 2);
/// assert_eq!(violations[0].message, "Type mismatch: expected int");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTypeConstraint {
    target: LogicalType,
}

impl DataTypeConstraint {
    pub fn new(target: LogicalType) -> Self {
        Self { target }
    }

    pub fn target(&self) -> LogicalType {
        self.target
    }

    /// Coerces the view's working values and returns them with the
    /// violations for cells that failed to convert.
    #[instrument(skip(self, column), fields(
        constraint.name = "data_type",
        constraint.column = %column.name(),
        constraint.target = %self.target
    ))]
    pub fn apply(&self, column: &ColumnView<'_>) -> (Vec<Value>, Vec<Violation>) {
        let coerced = coerce(column.values(), self.target);
        let message = format!("Type mismatch: expected {}", self.target);
        let violations: Vec<Violation> = coerced
            .failed_rows()
            .map(|row| Violation::at_row(row, column.name(), message.clone()))
            .collect();

        debug!(
            result.failures = violations.len(),
            data.rows = column.values().len(),
            "Coerced column"
        );

        (coerced.values, violations)
    }
}

impl Evaluator for DataTypeConstraint {
    fn name(&self) -> &str {
        "data_type"
    }

    fn evaluate(&self, column: &ColumnView<'_>) -> Vec<Violation> {
        self.apply(column).1
    }

    fn description(&self) -> Option<String> {
        Some(format!("Checks that values convert to {}", self.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Column;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_int_coercion() {
        let values = vec![
            Value::Int(10),
            Value::Float(3.0),
            Value::Float(2.5),
            Value::from(" 42 "),
            Value::from("7.0"),
            Value::from("abc"),
            Value::Null,
            Value::Bool(true),
        ];
        let coerced = coerce(&values, LogicalType::Int);

        assert_eq!(
            coerced.values,
            vec![
                Value::Int(10),
                Value::Int(3),
                Value::Null,
                Value::Int(42),
                Value::Int(7),
                Value::Null,
                Value::Null,
                Value::Int(1),
            ]
        );
        assert_eq!(coerced.failed_rows().collect::<Vec<_>>(), vec![2, 5]);
    }

    #[test]
    fn test_float_coercion() {
        let values = vec![
            Value::Int(2),
            Value::from("1e3"),
            Value::from("NaN"),
            Value::from("x"),
            Value::Float(f64::NAN),
        ];
        let coerced = coerce(&values, LogicalType::Float);

        assert_eq!(coerced.values[0], Value::Float(2.0));
        assert_eq!(coerced.values[1], Value::Float(1000.0));
        assert!(coerced.values[2].is_null());
        assert!(coerced.values[3].is_null());
        // NaN at rest is null, so it is not a coercion failure
        assert_eq!(coerced.failures, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_string_coercion_never_fails() {
        let values = vec![Value::Int(1), Value::Float(2.0), date(2020, 1, 2), Value::Null];
        let coerced = coerce(&values, LogicalType::String);

        assert_eq!(
            coerced.values,
            vec![
                Value::from("1"),
                Value::from("2.0"),
                Value::from("2020-01-02"),
                Value::Null
            ]
        );
        assert_eq!(coerced.failure_count(), 0);
    }

    #[test]
    fn test_date_coercion() {
        let values = vec![
            Value::from("2022-01-01"),
            Value::from("2022-01-01 10:30:00"),
            date(2023, 5, 5),
            Value::from("yesterday"),
            Value::Int(20220101),
        ];
        let coerced = coerce(&values, LogicalType::Date);

        assert_eq!(coerced.values[0], date(2022, 1, 1));
        assert_eq!(coerced.values[1], date(2022, 1, 1));
        assert_eq!(coerced.values[2], date(2023, 5, 5));
        assert_eq!(coerced.failed_rows().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_data_type_constraint_reports_failures() {
        let column = Column::new("age", vec![Value::from("10"), Value::Null, Value::from("old")]);
        let (values, violations) =
            DataTypeConstraint::new(LogicalType::Int).apply(&ColumnView::new(&column));

        assert_eq!(values, vec![Value::Int(10), Value::Null, Value::Null]);
        assert_eq!(
            violations,
            vec![Violation::at_row(2, "age", "Type mismatch: expected int")]
        );
    }
}
