//! The validator: runs a rule set against a table and builds the report.

use super::{BoxedEvaluator, ColumnView, Report, Rule, RuleSet, Table, Violation};
use crate::constraints::{
    CompletenessConstraint, DataTypeConstraint, PatternConstraint, RangeConstraint,
    UniquenessConstraint,
};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Runtime options for a [`Validator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Evaluate rules on worker threads
    pub parallel: bool,
    /// Upper bound on worker threads when `parallel` is set
    pub max_workers: usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            max_workers: num_cpus::get(),
        }
    }
}

/// Evaluates rule sets against tables.
///
/// Rules are independent: each sees the table as loaded, coerces its own
/// working copy of the column, and produces its violations without affecting
/// any other rule. Violations are reported in rule order, then check order,
/// then row order, whether or not the rules ran in parallel.
///
/// # Examples
///
/// ```rust
/// use table_guard::core::{Column, LogicalType, Rule, RuleSet, Table, Validator};
///
/// # fn example() -> table_guard::prelude::Result<()> {
/// let table = Table::new(vec![
///     Column::new("user_id", vec![1_i64, 2, 2]),
///     Column::new("age", vec![Some(10_i64), None, Some(200)]),
/// ])?;
///
/// let rules = RuleSet::default()
///     .with_rule(Rule::new("user_id").with_unique(true))
///     .with_rule(Rule::new("age").with_type(LogicalType::Int).with_min(0).with_max(120));
///
/// let report = Validator::builder().parallel(true).build().validate(&table, &rules);
///
/// assert!(!report.summary.validation_passed);
/// assert_eq!(report.summary.rows_checked, 3);
/// assert_eq!(report.failed_rows("user_id"), vec![1, 2]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    /// Creates a sequential validator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Runs every rule against the table and summarizes the violations.
    #[instrument(skip(self, table, rules), fields(
        table.rows = table.num_rows(),
        table.columns = table.num_columns(),
        rules.count = rules.len(),
        validator.parallel = self.options.parallel
    ))]
    pub fn validate(&self, table: &Table, rules: &RuleSet) -> Report {
        let start = Instant::now();

        let workers = self.options.max_workers.clamp(1, rules.len().max(1));
        let per_rule = if self.options.parallel && workers > 1 {
            evaluate_parallel(table, rules.rules(), workers)
        } else {
            rules.iter().map(|rule| evaluate_rule(table, rule)).collect()
        };

        let errors: Vec<Violation> = per_rule.into_iter().flatten().collect();
        let report = Report::new(table.num_rows(), errors);

        info!(
            summary.rows_checked = report.summary.rows_checked,
            summary.rows_failed = report.summary.rows_failed,
            summary.validation_passed = report.summary.validation_passed,
            summary.violations = report.errors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Validation completed"
        );
        report
    }
}

/// Builder for [`Validator`].
#[derive(Debug, Clone, Default)]
pub struct ValidatorBuilder {
    options: ValidatorOptions,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables evaluation of rules on worker threads.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.options.parallel = enabled;
        self
    }

    /// Caps the number of worker threads. Values below 1 are treated as 1.
    pub fn max_workers(mut self, workers: usize) -> Self {
        self.options.max_workers = workers.max(1);
        self
    }

    pub fn options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Validator {
        Validator {
            options: self.options,
        }
    }
}

/// Validates `table` against `rules` sequentially.
///
/// Shorthand for `Validator::new().validate(table, rules)`.
pub fn validate(table: &Table, rules: &RuleSet) -> Report {
    Validator::new().validate(table, rules)
}

/// Evaluates a single rule and returns its violations in check order.
///
/// A rule without a column, or naming a column the table lacks, yields one
/// rule-level violation and runs no checks.
pub fn evaluate_rule(table: &Table, rule: &Rule) -> Vec<Violation> {
    let Some(name) = rule.column() else {
        warn!("Rule has no column");
        return vec![Violation::for_rule("-", "Rule missing 'column' key")];
    };
    let Some(column) = table.column(name) else {
        warn!(rule.column = %name, "Rule column not found in dataset");
        return vec![Violation::for_rule(name, "Column not found in dataset")];
    };

    if !rule.has_checks() {
        debug!(rule.column = %name, "Rule enables no checks");
        return Vec::new();
    }

    let mut violations = Vec::new();
    let mut view = ColumnView::new(column);

    if let Some(logical_type) = rule.logical_type() {
        let (values, mismatches) = DataTypeConstraint::new(logical_type).apply(&view);
        violations.extend(mismatches);
        view = view.with_values(values);
    }

    for evaluator in evaluators_for(rule) {
        let found = evaluator.evaluate(&view);
        debug!(
            rule.column = %name,
            constraint.name = %evaluator.name(),
            constraint.description = evaluator.description().as_deref().unwrap_or(""),
            column.coerced = view.is_coerced(),
            result.violations = found.len(),
            "Check evaluated"
        );
        violations.extend(found);
    }

    violations
}

/// Builds the checks a rule enables, in evaluation order.
fn evaluators_for(rule: &Rule) -> Vec<BoxedEvaluator> {
    let mut evaluators: Vec<BoxedEvaluator> = Vec::new();
    if rule.is_not_null() {
        evaluators.push(Box::new(CompletenessConstraint::new()));
    }
    if rule.is_unique() {
        evaluators.push(Box::new(UniquenessConstraint::new()));
    }
    if rule.has_range() {
        evaluators.push(Box::new(RangeConstraint::new(
            rule.min().cloned(),
            rule.max().cloned(),
        )));
    }
    if let Some(pattern) = rule.pattern() {
        evaluators.push(Box::new(PatternConstraint::new(pattern.clone())));
    }
    evaluators
}

/// Splits rules into contiguous chunks, one per worker, and reassembles the
/// per-rule results in declaration order.
///
/// Workers log under the caller's subscriber and inside the `validate` span.
fn evaluate_parallel(table: &Table, rules: &[Rule], workers: usize) -> Vec<Vec<Violation>> {
    let chunk_size = rules.len().div_ceil(workers);
    debug!(workers, chunk_size, "Evaluating rules in parallel");

    let span = tracing::Span::current();
    let dispatch = tracing::dispatcher::get_default(|dispatch| dispatch.clone());

    std::thread::scope(|scope| {
        let handles: Vec<_> = rules
            .chunks(chunk_size)
            .map(|chunk| {
                let span = span.clone();
                let dispatch = dispatch.clone();
                scope.spawn(move || {
                    tracing::dispatcher::with_default(&dispatch, || {
                        span.in_scope(|| {
                            chunk
                                .iter()
                                .map(|rule| evaluate_rule(table, rule))
                                .collect::<Vec<_>>()
                        })
                    })
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(results) => results,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
