//! Conversion from Arrow record batches to [`Table`].

use crate::core::{Column, Table, Value};
use crate::prelude::*;
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, Schema, UInt64Type};
use arrow::record_batch::RecordBatch;
use arrow::temporal_conversions::date32_to_datetime;

/// Concatenates record batches sharing `schema` into a table.
///
/// Zero batches yield a table with the schema's columns and no rows.
pub fn batches_to_table(schema: &Schema, batches: &[RecordBatch]) -> Result<Table> {
    let columns = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let mut values = Vec::new();
            for batch in batches {
                values.extend(array_values(batch.column(index))?);
            }
            Ok(Column::new(field.name().clone(), values))
        })
        .collect::<Result<Vec<_>>>()?;

    Table::new(columns)
}

/// Converts one Arrow array into cell values.
///
/// Integers become [`Value::Int`], except unsigned values beyond `i64::MAX`
/// which become [`Value::Float`]. Floats become [`Value::Float`], booleans
/// [`Value::Bool`], dates [`Value::Date`] and strings [`Value::Str`]. Any
/// other type is cast to its text rendering.
pub fn array_values(array: &ArrayRef) -> Result<Vec<Value>> {
    use DataType::*;

    let values = match array.data_type() {
        Null => vec![Value::Null; array.len()],
        UInt64 => array
            .as_primitive::<UInt64Type>()
            .iter()
            .map(|v| match v {
                None => Value::Null,
                Some(u) => i64::try_from(u).map_or(Value::Float(u as f64), Value::Int),
            })
            .collect(),
        Int8 | Int16 | Int32 | Int64 | UInt8 | UInt16 | UInt32 => {
            let ints = cast(array, &Int64)?;
            ints.as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Int))
                .collect()
        }
        Float16 | Float32 | Float64 => {
            let floats = cast(array, &Float64)?;
            floats
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::Float))
                .collect()
        }
        Boolean => array
            .as_boolean()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        Date32 | Date64 => {
            let days = cast(array, &Date32)?;
            days.as_primitive::<arrow::datatypes::Date32Type>()
                .iter()
                .map(|v| {
                    v.and_then(date32_to_datetime)
                        .map_or(Value::Null, |dt| Value::Date(dt.date()))
                })
                .collect()
        }
        _ => {
            let text = cast(array, &Utf8)?;
            text.as_string::<i32>()
                .iter()
                .map(|v| v.map_or(Value::Null, Value::from))
                .collect()
        }
    };
    Ok(values)
}
