//! Evaluator trait shared by all per-column checks.

use super::{Column, Value, Violation};
use std::borrow::Cow;
use std::fmt::Debug;

/// The column an evaluator inspects.
///
/// `raw` is the column exactly as loaded. `values` is the working copy the
/// rule sees after optional type coercion; without coercion it borrows `raw`.
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    name: &'a str,
    raw: &'a [Value],
    values: Cow<'a, [Value]>,
}

impl<'a> ColumnView<'a> {
    /// A view whose working values are the raw values.
    pub fn new(column: &'a Column) -> Self {
        Self {
            name: column.name(),
            raw: column.values(),
            values: Cow::Borrowed(column.values()),
        }
    }

    /// Replaces the working values with a coerced copy.
    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.values = Cow::Owned(values);
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Values as loaded, before any coercion.
    pub fn raw(&self) -> &[Value] {
        self.raw
    }

    /// Values after coercion, if any was applied.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn is_coerced(&self) -> bool {
        matches!(self.values, Cow::Owned(_))
    }
}

/// A single check applied to one column.
///
/// Implementations are stateless beyond their configuration and never
/// short-circuit each other: each returns every violation it finds, in
/// ascending row order.
///
/// # Examples
///
/// ```rust
/// use table_guard::core::{ColumnView, Evaluator, Value, Violation};
///
/// #[derive(Debug)]
/// struct NoNegatives;
///
/// impl Evaluator for NoNegatives {
///     fn name(&self) -> &str {
///         "no_negatives"
///     }
///
///     fn evaluate(&self, column: &ColumnView<'_>) -> Vec<Violation> {
///         column
///             .values()
///             .iter()
///             .enumerate()
///             .filter(|(_, v)| matches!(v, Value::Int(i) if *i < 0))
///             .map(|(row, _)| Violation::at_row(row, column.name(), "Negative value"))
///             .collect()
///     }
/// }
/// ```
pub trait Evaluator: Debug + Send + Sync {
    /// Returns the name of the check, used in log fields.
    fn name(&self) -> &str;

    /// Runs the check and returns its violations.
    fn evaluate(&self, column: &ColumnView<'_>) -> Vec<Violation>;

    /// Returns a description of what this check validates.
    fn description(&self) -> Option<String> {
        None
    }
}

/// A boxed evaluator for use in collections.
pub type BoxedEvaluator = Box<dyn Evaluator>;
