//! Completeness constraint: flags null cells.

use crate::core::{ColumnView, Evaluator, Violation};
use tracing::{debug, instrument};

/// Reports every row whose working value is null.
///
/// Runs on the coerced values when the rule declares a type, so a cell that
/// failed coercion is reported here as well as by the type check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletenessConstraint;

impl CompletenessConstraint {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for CompletenessConstraint {
    fn name(&self) -> &str {
        "completeness"
    }

    #[instrument(skip(self, column), fields(constraint.name = "completeness", constraint.column = %column.name()))]
    fn evaluate(&self, column: &ColumnView<'_>) -> Vec<Violation> {
        let violations: Vec<Violation> = column
            .values()
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_null())
            .map(|(row, _)| Violation::at_row(row, column.name(), "Null value not allowed"))
            .collect();

        debug!(result.nulls = violations.len(), "Evaluated completeness");
        violations
    }

    fn description(&self) -> Option<String> {
        Some("Checks that no value is null".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, Value};

    #[test]
    fn test_flags_nulls_and_nan() {
        let column = Column::new(
            "score",
            vec![Value::Float(1.0), Value::Null, Value::Float(f64::NAN), Value::Int(0)],
        );
        let violations = CompletenessConstraint::new().evaluate(&ColumnView::new(&column));

        assert_eq!(
            violations,
            vec![
                Violation::at_row(1, "score", "Null value not allowed"),
                Violation::at_row(2, "score", "Null value not allowed"),
            ]
        );
    }

    #[test]
    fn test_uses_coerced_values() {
        let column = Column::new("age", vec!["10", "unknown"]);
        let view = ColumnView::new(&column).with_values(vec![Value::Int(10), Value::Null]);
        let violations = CompletenessConstraint::new().evaluate(&view);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row, Some(1));
    }

    #[test]
    fn test_empty_strings_are_not_null() {
        let column = Column::new("name", vec!["", " "]);
        assert!(CompletenessConstraint::new()
            .evaluate(&ColumnView::new(&column))
            .is_empty());
    }
}
