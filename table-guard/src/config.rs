//! Loading rule sets from YAML configuration documents.
//!
//! A configuration document is a mapping with a `rules` key holding an
//! ordered list of rule mappings:
//!
//! ```yaml
//! rules:
//!   - column: user_id
//!     not_null: true
//!     unique: true
//!   - column: age
//!     type: int
//!     min: 0
//!     max: 120
//!   - column: email
//!     regex: '^[^@\s]+@[^@\s]+\.[^@\s]+$'
//!   - column: signup_date
//!     type: date
//!     min: '2020-01-01'
//!     max: '2025-12-31'
//! ```
//!
//! An unparseable document or a regex that does not compile fails the load
//! with [`GuardError::Configuration`] or [`GuardError::InvalidPattern`].
//! Unrecognised rule keys are ignored with a warning. A `type` outside
//! `int`/`float`/`string`/`date` is also warned about and the rule runs
//! without coercion. A rule without a `column` is accepted here and reported
//! as a violation when the rule set runs.

use crate::core::{Literal, LogicalType, Rule, RuleSet};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// A rule exactly as written in the configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default, rename = "type")]
    pub logical_type: Option<String>,
    #[serde(default)]
    pub not_null: Option<bool>,
    #[serde(default)]
    pub unique: Option<bool>,
    #[serde(default)]
    pub min: Option<Literal>,
    #[serde(default)]
    pub max: Option<Literal>,
    #[serde(default)]
    pub regex: Option<String>,
    /// Keys this version does not understand
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl RuleSpec {
    /// Validates the entry and compiles it into a [`Rule`].
    ///
    /// Unknown keys and unknown `type` names are logged and skipped.
    pub fn into_rule(self) -> Result<Rule> {
        let column = self.column.as_deref().unwrap_or("-");
        for key in self.extra.keys() {
            warn!(rule.column = column, rule.key = %key, "Ignoring unknown rule key");
        }

        let logical_type = match self.logical_type.as_deref().filter(|t| !t.is_empty()) {
            None => None,
            Some(name) => match name.parse::<LogicalType>() {
                Ok(logical_type) => Some(logical_type),
                Err(e) => {
                    warn!(rule.column = column, error = %e, "Skipping type coercion");
                    None
                }
            },
        };

        let mut rule = Rule::default()
            .with_column(self.column)
            .with_not_null(self.not_null.unwrap_or(false))
            .with_unique(self.unique.unwrap_or(false));

        if let Some(logical_type) = logical_type {
            rule = rule.with_type(logical_type);
        }
        if let Some(min) = self.min {
            rule = rule.with_min(min);
        }
        if let Some(max) = self.max {
            rule = rule.with_max(max);
        }
        if let Some(pattern) = self.regex {
            rule = rule.with_regex(&pattern)?;
        }
        Ok(rule)
    }
}

/// A parsed rule configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub rules: Option<Vec<RuleSpec>>,
}

impl RuleConfig {
    /// Parses a YAML document. An empty document has no rules.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Self> = serde_yaml::from_str(text)
            .map_err(|e| GuardError::configuration(format!("malformed rule document: {e}")))?;
        Ok(config.unwrap_or_default())
    }

    /// Reads and parses a YAML file.
    #[instrument(fields(config.path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("loading rules from {}", path.display()))?;
        info!(rules.count = config.len(), "Loaded rule configuration");
        Ok(config)
    }

    pub fn len(&self) -> usize {
        self.rules.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates every rule and returns them as an ordered [`RuleSet`].
    ///
    /// Errors name the 1-based position of the offending rule.
    pub fn into_rule_set(self) -> Result<RuleSet> {
        self.rules
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                debug!(rule.index = index, rule.column = ?spec.column, "Compiling rule");
                spec.into_rule().map_err(|e| match e {
                    GuardError::Configuration(msg) => {
                        GuardError::configuration(format!("rule #{}: {msg}", index + 1))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// Parses a YAML document straight into a [`RuleSet`].
pub fn load_rules_from_str(text: &str) -> Result<RuleSet> {
    RuleConfig::from_yaml_str(text)?.into_rule_set()
}

/// Reads a YAML file straight into a [`RuleSet`].
pub fn load_rules(path: impl AsRef<Path> + std::fmt::Debug) -> Result<RuleSet> {
    RuleConfig::from_path(path)?.into_rule_set()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
rules:
  - column: user_id
    not_null: true
    unique: true
  - column: age
    type: int
    min: 0
    max: 120.5
  - column: email
    regex: '^[^@\s]+@[^@\s]+\.[^@\s]+$'
  - column: signup_date
    type: date
    min: '2020-01-01'
"#;

    #[test]
    fn test_parses_rules_in_order() {
        let rules = load_rules_from_str(CONFIG).unwrap();
        assert_eq!(rules.len(), 4);

        let columns: Vec<_> = rules.iter().filter_map(Rule::column).collect();
        assert_eq!(columns, vec!["user_id", "age", "email", "signup_date"]);

        let user_id = &rules.rules()[0];
        assert!(user_id.is_not_null() && user_id.is_unique());

        let age = &rules.rules()[1];
        assert_eq!(age.logical_type(), Some(LogicalType::Int));
        assert_eq!(age.min(), Some(&Literal::Int(0)));
        assert_eq!(age.max(), Some(&Literal::Float(120.5)));

        let email = &rules.rules()[2];
        assert!(email.pattern().unwrap().is_full_match("a@b.com"));

        let signup = &rules.rules()[3];
        assert_eq!(signup.min(), Some(&Literal::Str("2020-01-01".to_string())));
    }

    #[test]
    fn test_empty_documents() {
        assert!(load_rules_from_str("").unwrap().is_empty());
        assert!(load_rules_from_str("~").unwrap().is_empty());
        assert!(load_rules_from_str("rules:").unwrap().is_empty());
        assert!(load_rules_from_str("version: 2").unwrap().is_empty());
    }

    #[test]
    fn test_rule_without_column_is_kept() {
        let rules = load_rules_from_str("rules:\n  - not_null: true\n").unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.rules()[0].column(), None);
    }

    #[test]
    fn test_empty_type_is_absent() {
        let rules = load_rules_from_str("rules:\n  - column: a\n    type: ''\n").unwrap();
        assert_eq!(rules.rules()[0].logical_type(), None);
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let rules = load_rules_from_str(
            "rules:\n  - column: a\n  - column: b\n    type: integer\n    not_null: true\n",
        )
        .unwrap();
        assert_eq!(rules.len(), 2);

        let b = &rules.rules()[1];
        assert_eq!(b.logical_type(), None);
        assert!(b.is_not_null());
    }

    #[test]
    fn test_unknown_type_leaves_cells_uncoerced() {
        use crate::core::{validate, Column, Table};

        let table = Table::new(vec![Column::new("age", vec!["10", "x"])]).unwrap();
        let rules = load_rules_from_str("rules:\n  - column: age\n    type: integer\n").unwrap();
        let report = validate(&table, &rules);
        assert!(report.summary.validation_passed);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let rules =
            load_rules_from_str("rules:\n  - column: a\n    nullable: false\n    unique: true\n")
                .unwrap();
        let rule = &rules.rules()[0];
        assert_eq!(rule.column(), Some("a"));
        assert!(rule.is_unique());
        assert!(!rule.is_not_null());
    }

    #[test]
    fn test_unknown_keys_are_collected() {
        let config = RuleConfig::from_yaml_str("rules:\n  - column: a\n    severity: high\n").unwrap();
        let spec = &config.rules.as_ref().unwrap()[0];
        assert_eq!(spec.column.as_deref(), Some("a"));
        assert!(spec.extra.contains_key("severity"));
    }

    #[test]
    fn test_invalid_regex_is_fatal() {
        let err = load_rules_from_str("rules:\n  - column: a\n    regex: '[unclosed'\n").unwrap_err();
        assert!(matches!(err, GuardError::InvalidPattern { .. }));
    }

    #[test]
    fn test_malformed_document() {
        assert!(load_rules_from_str("rules: [").is_err());
        assert!(load_rules_from_str("rules: 5").is_err());
        assert!(load_rules_from_str("- column: a").is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, CONFIG).unwrap();

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.len(), 4);

        let missing = load_rules(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, GuardError::Io(_)));
    }
}
