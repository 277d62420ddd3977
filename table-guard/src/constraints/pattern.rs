//! Pattern constraint: full-string regex matching.

use crate::core::{ColumnView, Evaluator, Pattern, Violation};
use crate::logging::truncate_field;
use tracing::{debug, instrument};

/// Reports non-null cells whose text form does not match the whole pattern.
///
/// The pattern is compiled once, when the [`Pattern`] is built, so an invalid
/// regex surfaces as a configuration error before any data is read.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternConstraint {
    pattern: Pattern,
}

impl PatternConstraint {
    pub fn new(pattern: Pattern) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl Evaluator for PatternConstraint {
    fn name(&self) -> &str {
        "pattern"
    }

    #[instrument(skip(self, column), fields(
        constraint.name = "pattern",
        constraint.column = %column.name(),
        constraint.pattern = %truncate_field(self.pattern.as_str(), 128)
    ))]
    fn evaluate(&self, column: &ColumnView<'_>) -> Vec<Violation> {
        let violations: Vec<Violation> = column
            .values()
            .iter()
            .enumerate()
            .filter_map(|(row, value)| {
                let text = value.as_text()?;
                (!self.pattern.is_full_match(&text)).then(|| {
                    Violation::at_row(row, column.name(), format!("Regex mismatch: {text}"))
                })
            })
            .collect();

        debug!(result.mismatches = violations.len(), "Evaluated pattern");
        violations
    }

    fn description(&self) -> Option<String> {
        Some(format!("Checks that values fully match /{}/", self.pattern.as_str()))
    }
}
