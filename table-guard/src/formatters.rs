//! Report rendering for table-guard validation results.
//!
//! Two renderers ship with the crate: [`JsonFormatter`] for machine
//! consumption and [`MarkdownFormatter`] for people. Both work on the same
//! [`Report`] and never change its content, only its presentation.
//!
//! # Examples
//!
//! ```rust
//! use table_guard::core::{Report, Violation};
//! use table_guard::formatters::{JsonFormatter, MarkdownFormatter, ReportFormatter};
//!
//! let report = Report::new(3, vec![Violation::at_row(1, "email", "Regex mismatch: bad@")]);
//!
//! let json = JsonFormatter::new().format(&report).unwrap();
//! assert!(json.contains("\"rows_failed\": 1"));
//!
//! let markdown = MarkdownFormatter::new().format(&report).unwrap();
//! assert!(markdown.contains("- Row `1`, Column `email` → Regex mismatch: bad@"));
//! ```

use crate::core::Report;
use crate::prelude::*;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Configuration options for rendering reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Include the individual violations
    pub include_errors: bool,
    /// Maximum number of violations to render (`None` for all)
    pub max_errors: Option<usize>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_errors: true,
            max_errors: None,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_errors: false,
            max_errors: Some(0),
        }
    }

    /// Creates a configuration suitable for CI logs.
    pub fn ci() -> Self {
        Self {
            include_errors: true,
            max_errors: Some(50),
        }
    }

    /// Sets whether to include individual violations.
    pub fn with_errors(mut self, include: bool) -> Self {
        self.include_errors = include;
        self
    }

    /// Sets the maximum number of violations to render.
    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max);
        self
    }

    /// Number of violations of `report` that should be rendered.
    fn visible_errors(&self, report: &Report) -> usize {
        if !self.include_errors {
            return 0;
        }
        self.max_errors
            .map_or(report.errors.len(), |max| max.min(report.errors.len()))
    }
}

/// Trait for rendering reports into different output formats.
///
/// # Examples
///
/// ```rust
/// use table_guard::core::Report;
/// use table_guard::formatters::ReportFormatter;
///
/// struct OneLine;
///
/// impl ReportFormatter for OneLine {
///     fn format(&self, report: &Report) -> table_guard::prelude::Result<String> {
///         Ok(format!("passed={}", report.summary.validation_passed))
///     }
/// }
///
/// assert_eq!(OneLine.format(&Report::new(0, vec![])).unwrap(), "passed=true");
/// ```
pub trait ReportFormatter {
    /// Renders a report with the formatter's own configuration.
    fn format(&self, report: &Report) -> Result<String>;

    /// Renders a report with an explicit configuration.
    ///
    /// The default implementation ignores `config`.
    fn format_with_config(&self, report: &Report, _config: &FormatterConfig) -> Result<String> {
        self.format(report)
    }
}

/// Renders reports as JSON with the stable field names
/// `summary.{rows_checked,rows_failed,validation_passed}` and
/// `errors[].{row,column,error}`.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a pretty-printing JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    /// Creates a new JSON formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &Report, config: &FormatterConfig) -> Result<String> {
        let visible = config.visible_errors(report);
        let filtered;
        let report = if visible < report.errors.len() {
            // the summary still describes the whole run
            filtered = Report {
                summary: report.summary,
                errors: report.errors[..visible].to_vec(),
            };
            &filtered
        } else {
            report
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

/// Renders reports as a Markdown document.
///
/// ```text
/// # Data Validation Report
///
/// - **Rows checked:** 3
/// - **Rows failed:** 2
/// - **Validation passed:** false
///
/// ## Errors
/// - Row `1`, Column `user_id` → Duplicate value found
/// - Row `-`, Column `ghost` → Column not found in dataset
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &Report, config: &FormatterConfig) -> Result<String> {
        let summary = &report.summary;
        let mut output = String::new();
        let fmt_err = |e: std::fmt::Error| GuardError::Internal(format!("Failed to render report: {e}"));

        writeln!(output, "# Data Validation Report").map_err(fmt_err)?;
        writeln!(output).map_err(fmt_err)?;
        writeln!(output, "- **Rows checked:** {}", summary.rows_checked).map_err(fmt_err)?;
        writeln!(output, "- **Rows failed:** {}", summary.rows_failed).map_err(fmt_err)?;
        writeln!(output, "- **Validation passed:** {}", summary.validation_passed)
            .map_err(fmt_err)?;
        writeln!(output).map_err(fmt_err)?;

        if report.errors.is_empty() {
            write!(output, "No errors 🎉").map_err(fmt_err)?;
            return Ok(output);
        }

        let visible = config.visible_errors(report);
        writeln!(output, "## Errors").map_err(fmt_err)?;
        for violation in &report.errors[..visible] {
            let row = violation
                .row
                .map_or_else(|| "-".to_string(), |r| r.to_string());
            writeln!(
                output,
                "- Row `{row}`, Column `{}` → {}",
                violation.column, violation.message
            )
            .map_err(fmt_err)?;
        }

        let hidden = report.errors.len() - visible;
        if hidden > 0 {
            writeln!(output).map_err(fmt_err)?;
            writeln!(output, "> **Note:** {hidden} additional errors not shown in this report.")
                .map_err(fmt_err)?;
        }

        Ok(output)
    }
}

/// Writes `<prefix>.json` and `<prefix>.md` and returns both paths.
#[instrument(skip(report), fields(report.errors = report.errors.len()))]
pub fn write_reports(report: &Report, prefix: &Path) -> Result<(PathBuf, PathBuf)> {
    let json_path = with_suffix(prefix, "json");
    let md_path = with_suffix(prefix, "md");

    std::fs::write(&json_path, JsonFormatter::new().format(report)?)?;
    std::fs::write(&md_path, MarkdownFormatter::new().format(report)?)?;

    info!(
        json = %json_path.display(),
        markdown = %md_path.display(),
        "Reports written"
    );
    Ok((json_path, md_path))
}

/// Appends `.ext` to the prefix without replacing an existing extension.
fn with_suffix(prefix: &Path, ext: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
