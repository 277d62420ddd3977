//! Shared fixtures for unit tests.

use crate::core::{Column, LogicalType, Report, Rule, RuleSet, Table, Value};

pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// The four-column customer table used across tests.
pub fn scenario_table() -> Table {
    Table::new(vec![
        Column::new("user_id", vec![1_i64, 2, 2]),
        Column::new("age", vec![Some(10_i64), None, Some(200)]),
        Column::new("email", vec!["a@b.com", "bad@", "c@d.com"]),
        Column::new(
            "signup_date",
            vec![
                Value::from("2022-01-01"),
                Value::from("2019-01-01"),
                Value::from("2023-05-05"),
            ],
        ),
    ])
    .expect("scenario table is well formed")
}

/// Rules matching [`scenario_table`].
pub fn scenario_rules() -> RuleSet {
    RuleSet::default()
        .with_rule(Rule::new("user_id").with_unique(true))
        .with_rule(
            Rule::new("age")
                .with_type(LogicalType::Int)
                .with_min(0)
                .with_max(120),
        )
        .with_rule(
            Rule::new("email")
                .with_regex(EMAIL_PATTERN)
                .expect("email pattern compiles"),
        )
        .with_rule(
            Rule::new("signup_date")
                .with_type(LogicalType::Date)
                .with_min("2020-01-01"),
        )
}

/// `(row, message)` pairs reported for `column`, in report order.
pub fn messages_for(report: &Report, column: &str) -> Vec<(Option<usize>, String)> {
    report
        .errors_for_column(column)
        .map(|v| (v.row, v.message.clone()))
        .collect()
}
