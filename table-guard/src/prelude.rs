//! Prelude for commonly used types and traits in table-guard.

pub use crate::core::{Report, Rule, RuleSet, Table, Validator};
pub use crate::error::{ErrorContext, GuardError, Result};
pub use crate::formatters::{FormatterConfig, ReportFormatter};
pub use crate::logging::setup::LoggingConfig;
