//! Core validation types for the table-guard library.
//!
//! This module provides the fundamental types for describing a dataset,
//! declaring rules against its columns, and running a validation.
//!
//! ## Overview
//!
//! - **[`Table`]** / **[`Column`]** / **[`Value`]**: the in-memory dataset
//! - **[`Rule`]** / **[`RuleSet`]**: declarative per-column checks
//! - **[`Evaluator`]**: the trait every check implements
//! - **[`Validator`]**: runs a rule set against a table
//! - **[`Report`]**: the summary plus every [`Violation`] found
//!
//! ## Architecture
//!
//! ```text
//! Table + RuleSet
//!     └── Rule (per rule, in order)
//!         ├── type coercion  (working copy of the column)
//!         ├── not-null
//!         ├── uniqueness     (raw values)
//!         ├── range
//!         └── regex
//!                 └── Violations ──> Summary ──> Report
//! ```
//!
//! ## Example
//!
//! ```rust
//! use table_guard::core::{validate, Column, LogicalType, Rule, RuleSet, Table};
//!
//! # fn example() -> table_guard::prelude::Result<()> {
//! let table = Table::new(vec![
//!     Column::new("email", vec!["a@b.com", "bad@", "c@d.com"]),
//!     Column::new("signup_date", vec!["2022-01-01", "2019-01-01", "2023-05-05"]),
//! ])?;
//!
//! let rules = RuleSet::default()
//!     .with_rule(Rule::new("email").with_regex(r"[^@\s]+@[^@\s]+\.[^@\s]+")?)
//!     .with_rule(Rule::new("signup_date").with_type(LogicalType::Date).with_min("2020-01-01"));
//!
//! let report = validate(&table, &rules);
//! for violation in &report.errors {
//!     println!("{:?} {}: {}", violation.row, violation.column, violation.message);
//! }
//! assert_eq!(report.summary.rows_failed, 1);
//! # Ok(())
//! # }
//! ```

mod evaluator;
mod result;
mod rule;
mod suite;
mod table;
mod value;

pub use evaluator::{BoxedEvaluator, ColumnView, Evaluator};
pub use result::{Report, Summary, Violation};
pub use rule::{Literal, Pattern, Rule, RuleSet};
pub use suite::{evaluate_rule, validate, Validator, ValidatorBuilder, ValidatorOptions};
pub use table::{Column, Table};
pub use value::{parse_date, LogicalType, Value};
