//! # table-guard - Column-level validation for tabular data
//!
//! table-guard checks a dataset against a list of declarative column rules
//! and produces a report of every violation: which row, which column, and a
//! human-readable message.
//!
//! ## Overview
//!
//! A rule names one column and enables any of five checks, applied in this
//! order:
//!
//! 1. **type** coerces the column to `int`, `float`, `string` or `date`;
//!    cells that fail to convert are reported and become null
//! 2. **not_null** reports null cells
//! 3. **unique** reports every row taking part in a duplicated value
//! 4. **min/max** reports cells outside the inclusive bounds
//! 5. **regex** reports non-null cells whose text does not fully match
//!
//! Rules are independent of each other. Coercion in one rule is never seen by
//! another, so several rules may target the same column.
//!
//! ## Quick Start
//!
//! ```rust
//! use table_guard::prelude::*;
//! use table_guard::config::load_rules_from_str;
//! use table_guard::core::Column;
//!
//! # fn example() -> table_guard::prelude::Result<()> {
//! let table = Table::new(vec![
//!     Column::new("user_id", vec![1_i64, 2, 2]),
//!     Column::new("email", vec!["a@b.com", "bad@", "c@d.com"]),
//! ])?;
//!
//! let rules = load_rules_from_str(
//!     r#"
//! rules:
//!   - column: user_id
//!     unique: true
//!   - column: email
//!     regex: '^[^@\s]+@[^@\s]+\.[^@\s]+$'
//! "#,
//! )?;
//!
//! let report = Validator::new().validate(&table, &rules);
//!
//! assert!(!report.summary.validation_passed);
//! assert_eq!(report.summary.rows_failed, 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: table model, rules, the [`Validator`](core::Validator) and reports
//! - [`constraints`]: the individual checks
//! - [`config`]: YAML rule documents
//! - [`sources`]: CSV, JSON, Parquet and Excel loaders
//! - [`formatters`]: JSON and Markdown report renderers
//! - [`logging`]: `tracing` subscriber setup
//!
//! ## Logging
//!
//! The library emits `tracing` spans and events but never installs a
//! subscriber. Applications pick one, for example
//! [`logging::setup::init_logging`].

pub mod config;
pub mod constraints;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod sources;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use crate::core::validate;
