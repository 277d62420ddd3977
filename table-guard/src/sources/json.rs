//! JSON file source.
//!
//! Three layouts are accepted:
//!
//! - an array of record objects: `[{"id": 1}, {"id": 2}]`
//! - a column-oriented object: `{"id": [1, 2]}`
//! - newline-delimited record objects, one per line
//!
//! Columns appear in the order their keys are first seen. A record missing a
//! key contributes a null to that column.

use super::DataSource;
use crate::core::{Column, Table, Value};
use crate::prelude::*;
use async_trait::async_trait;
use serde_json::{Map, Value as Json};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Options for reading JSON files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonOptions {
    /// Treat the file as newline-delimited records without trying a single
    /// document first
    pub lines: bool,
}

#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
    options: JsonOptions,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: JsonOptions::default(),
        }
    }

    pub fn with_options(mut self, options: JsonOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl DataSource for JsonSource {
    #[instrument(skip(self), fields(source.type = "json", source.path = %self.path.display()))]
    async fn load(&self) -> Result<Table> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_json_table(&text, self.options.lines)
    }

    fn description(&self) -> String {
        format!("JSON file: {}", self.path.display())
    }
}

/// Parses JSON text into a table.
///
/// With `lines` unset the text is first tried as a single document; if that
/// fails it is read as newline-delimited records.
pub fn parse_json_table(text: &str, lines: bool) -> Result<Table> {
    if !lines {
        match serde_json::from_str::<Json>(text) {
            Ok(Json::Array(items)) => {
                debug!(records = items.len(), "Reading JSON record array");
                return from_records(items);
            }
            Ok(Json::Object(map)) if map.values().all(Json::is_array) && !map.is_empty() => {
                debug!(columns = map.len(), "Reading column-oriented JSON");
                return from_column_object(map);
            }
            Ok(Json::Object(map)) => return from_records(vec![Json::Object(map)]),
            Ok(other) => {
                return Err(GuardError::data_source(
                    "json",
                    format!("expected an array or object at top level, found {other}"),
                ))
            }
            Err(e) => debug!(error = %e, "Not a single JSON document, trying JSON lines"),
        }
    }

    let records = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<Json>(line).map_err(|e| {
                GuardError::data_source_with_source(
                    "json",
                    format!("invalid JSON on line {}", index + 1),
                    Box::new(e),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(records = records.len(), "Reading JSON lines");
    from_records(records)
}

fn from_records(records: Vec<Json>) -> Result<Table> {
    let mut names: Vec<String> = Vec::new();
    let mut rows: Vec<Map<String, Json>> = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let Json::Object(map) = record else {
            return Err(GuardError::data_source(
                "json",
                format!("record {index} is not an object"),
            ));
        };
        for key in map.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
        rows.push(map);
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values: Vec<Value> = rows
                .iter()
                .map(|row| row.get(&name).map_or(Value::Null, json_to_value))
                .collect();
            Column::new(name, values)
        })
        .collect();
    Table::new(columns)
}

fn from_column_object(map: Map<String, Json>) -> Result<Table> {
    let columns = map
        .into_iter()
        .map(|(name, values)| {
            let values: Vec<Value> = match values {
                Json::Array(items) => items.iter().map(json_to_value).collect(),
                _ => Vec::new(),
            };
            Column::new(name, values)
        })
        .collect();
    Table::new(columns).map_err(|e| GuardError::data_source("json", e.to_string()))
}

/// Scalars map onto their natural cell type. Nested arrays and objects are
/// kept as their JSON text.
fn json_to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or(Value::Null),
        Json::String(s) => Value::Str(s.clone()),
        nested => Value::Str(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(table: &Table, name: &str) -> Vec<Value> {
        table.column(name).unwrap().values().to_vec()
    }

    #[test]
    fn test_record_array() {
        let table = parse_json_table(
            r#"[{"id": 1, "name": "a"}, {"id": 2.5, "extra": true}]"#,
            false,
        )
        .unwrap();

        assert_eq!(table.column_names(), vec!["id", "name", "extra"]);
        assert_eq!(cells(&table, "id"), vec![Value::Int(1), Value::Float(2.5)]);
        assert_eq!(cells(&table, "name"), vec![Value::from("a"), Value::Null]);
        assert_eq!(cells(&table, "extra"), vec![Value::Null, Value::Bool(true)]);
    }

    #[test]
    fn test_key_order_is_preserved() {
        let table = parse_json_table(r#"[{"zeta": 1, "alpha": 2}]"#, false).unwrap();
        assert_eq!(table.column_names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_column_object() {
        let table = parse_json_table(r#"{"id": [1, null], "tags": [["x"], {"k": 1}]}"#, false)
            .unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(cells(&table, "id"), vec![Value::Int(1), Value::Null]);
        assert_eq!(
            cells(&table, "tags"),
            vec![Value::from(r#"["x"]"#), Value::from(r#"{"k":1}"#)]
        );
    }

    #[test]
    fn test_ragged_column_object() {
        let err = parse_json_table(r#"{"a": [1, 2], "b": [1]}"#, false).unwrap_err();
        assert!(matches!(err, GuardError::DataSource { .. }));
    }

    #[test]
    fn test_json_lines_fallback() {
        let text = "{\"id\": 1}\n\n{\"id\": 2, \"ok\": false}\n";
        for lines in [false, true] {
            let table = parse_json_table(text, lines).unwrap();
            assert_eq!(cells(&table, "id"), vec![Value::Int(1), Value::Int(2)]);
            assert_eq!(cells(&table, "ok"), vec![Value::Null, Value::Bool(false)]);
        }
    }

    #[test]
    fn test_single_record_object() {
        let table = parse_json_table(r#"{"id": 7}"#, false).unwrap();
        assert_eq!(table.num_rows(), 1);
        assert_eq!(cells(&table, "id"), vec![Value::Int(7)]);
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_json_table("{\"id\": 1}\nnot json\n", false).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(parse_json_table("[1, 2]", false).is_err());
        assert!(parse_json_table("42", false).is_err());
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(parse_json_table("[]", false).unwrap().num_rows(), 0);
        assert_eq!(parse_json_table("", true).unwrap().num_columns(), 0);
    }
}
