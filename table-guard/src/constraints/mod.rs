//! Built-in checks applied to a single column.
//!
//! Each check implements [`Evaluator`](crate::core::Evaluator) and is
//! independent of the others. For one rule the validator runs them in a
//! fixed order:
//!
//! 1. [`DataTypeConstraint`] - coerces the column and reports cells that fail
//!    to convert; later checks see the coerced values
//! 2. [`CompletenessConstraint`] - null cells
//! 3. [`UniquenessConstraint`] - duplicate raw values
//! 4. [`RangeConstraint`] - inclusive min/max bounds
//! 5. [`PatternConstraint`] - full-match regex
//!
//! ```rust
//! use table_guard::constraints::{CompletenessConstraint, RangeConstraint};
//! use table_guard::core::{Column, ColumnView, Evaluator, Value};
//!
//! let age = Column::new("age", vec![Some(10_i64), None, Some(200)]);
//! let view = ColumnView::new(&age);
//!
//! let nulls = CompletenessConstraint::new().evaluate(&view);
//! let out_of_range = RangeConstraint::new(Some(0.into()), Some(120.into())).evaluate(&view);
//!
//! assert_eq!(nulls[0].row, Some(1));
//! assert_eq!(out_of_range[0].message, "Value 200 above max 120");
//! ```

mod coercion;
mod completeness;
mod pattern;
mod range;
mod uniqueness;

pub use coercion::{coerce, coerce_value, Coerced, DataTypeConstraint};
pub use completeness::CompletenessConstraint;
pub use pattern::PatternConstraint;
pub use range::{compare, RangeConstraint};
pub use uniqueness::UniquenessConstraint;
