//! Declarative column rules and ordered rule sets.

use super::value::{format_float, LogicalType};
use crate::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar boundary as written in the rule configuration.
///
/// Boundaries stay untyped until a cell is compared against them; the range
/// check casts them to the cell's runtime category at that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{}", format_float(*x)),
            Literal::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

/// A compiled regex that must match a whole cell, not a substring of it.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPattern`] when the pattern does not compile.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            GuardError::InvalidPattern {
                pattern: source.clone(),
                source: e,
            }
        })?;
        Ok(Self { source, regex })
    }

    /// The pattern as written in the rule.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// A declarative check specification for one column.
///
/// Every check is optional; an absent check is simply not run. A rule without
/// a column is kept as-is and reported as a rule-level violation when the
/// rule set is evaluated.
///
/// # Examples
///
/// ```rust
/// use table_guard::core::{LogicalType, Rule};
///
/// # fn example() -> table_guard::prelude::Result<()> {
/// let age = Rule::new("age")
///     .with_type(LogicalType::Int)
///     .with_min(0)
///     .with_max(120);
///
/// let email = Rule::new("email").with_regex(r"[^@\s]+@[^@\s]+\.[^@\s]+")?;
/// assert!(email.pattern().is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rule {
    column: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    logical_type: Option<LogicalType>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    not_null: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<Literal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<Literal>,
    #[serde(rename = "regex", skip_serializing_if = "Option::is_none")]
    pattern: Option<Pattern>,
}

impl Rule {
    /// Creates a rule for `column` with no checks enabled.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            ..Self::default()
        }
    }

    /// Sets the column, or clears it with `None`.
    pub fn with_column(mut self, column: Option<String>) -> Self {
        self.column = column;
        self
    }

    pub fn with_type(mut self, logical_type: LogicalType) -> Self {
        self.logical_type = Some(logical_type);
        self
    }

    pub fn with_not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn with_min(mut self, min: impl Into<Literal>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Literal>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Compiles and attaches a full-match regex check.
    pub fn with_regex(self, pattern: &str) -> Result<Self> {
        Ok(self.with_pattern(Pattern::new(pattern)?))
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// The target column, `None` when the rule names no (or an empty) column.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref().filter(|c| !c.is_empty())
    }

    pub fn logical_type(&self) -> Option<LogicalType> {
        self.logical_type
    }

    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn min(&self) -> Option<&Literal> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Literal> {
        self.max.as_ref()
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn has_range(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Returns true when at least one check beyond column existence is set.
    pub fn has_checks(&self) -> bool {
        self.logical_type.is_some()
            || self.not_null
            || self.unique
            || self.has_range()
            || self.pattern.is_some()
    }
}

/// An ordered sequence of rules.
///
/// Order decides the order of violations in the report, never the outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_anchored() {
        let pattern = Pattern::new(r"[0-9]+").unwrap();
        assert!(pattern.is_full_match("123"));
        assert!(!pattern.is_full_match("a123"));
        assert!(!pattern.is_full_match("123a"));
    }

    #[test]
    fn test_pattern_alternation_is_anchored_as_a_whole() {
        let pattern = Pattern::new("cat|dog").unwrap();
        assert!(pattern.is_full_match("dog"));
        assert!(!pattern.is_full_match("dogs"));
        assert!(!pattern.is_full_match("bobcat"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Rule::new("email").with_regex("([a-z").unwrap_err();
        assert!(matches!(err, GuardError::InvalidPattern { ref pattern, .. } if pattern == "([a-z"));
    }

    #[test]
    fn test_rule_builder() {
        let rule = Rule::new("age")
            .with_type(LogicalType::Int)
            .with_not_null(true)
            .with_min(0)
            .with_max(120.5);

        assert_eq!(rule.column(), Some("age"));
        assert_eq!(rule.logical_type(), Some(LogicalType::Int));
        assert!(rule.is_not_null());
        assert!(!rule.is_unique());
        assert_eq!(rule.min(), Some(&Literal::Int(0)));
        assert_eq!(rule.max(), Some(&Literal::Float(120.5)));
        assert!(rule.has_checks());
    }

    #[test]
    fn test_empty_column_name_reads_as_missing() {
        assert_eq!(Rule::new("").column(), None);
        assert_eq!(Rule::default().column(), None);
        assert!(!Rule::new("id").has_checks());
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Int(0).to_string(), "0");
        assert_eq!(Literal::Float(120.0).to_string(), "120.0");
        assert_eq!(Literal::from("2020-01-01").to_string(), "2020-01-01");
    }

    #[test]
    fn test_rule_set_preserves_order() {
        let rules: RuleSet = ["b", "a", "c"].into_iter().map(Rule::new).collect();
        let columns: Vec<_> = rules.iter().filter_map(Rule::column).collect();
        assert_eq!(columns, vec!["b", "a", "c"]);
    }
}
