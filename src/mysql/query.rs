use std::sync::Arc;

use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::ContactsDbError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `MySQL` row, choosing the Rust type from the column type.
///
/// # Errors
///
/// Returns `ContactsDbError` if the value cannot be decoded.
pub fn mysql_extract_value(row: &MySqlRow, idx: usize) -> Result<RowValues, ContactsDbError> {
    let type_name = {
        let raw = row.try_get_raw(idx)?;
        if raw.is_null() {
            return Ok(RowValues::Null);
        }
        raw.type_info().name().to_string()
    };

    let value = match type_name.as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            RowValues::Int(row.try_get::<i64, _>(idx)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => {
            let unsigned = row.try_get::<u64, _>(idx)?;
            RowValues::Int(i64::try_from(unsigned).map_err(|_| {
                ContactsDbError::ExecutionError(format!(
                    "unsigned value {unsigned} in column {idx} does not fit in i64"
                ))
            })?)
        }
        "BOOLEAN" => RowValues::Bool(row.try_get(idx)?),
        "FLOAT" => RowValues::Float(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => RowValues::Float(row.try_get(idx)?),
        "DATE" => RowValues::Date(row.try_get(idx)?),
        "DATETIME" | "TIMESTAMP" => RowValues::Timestamp(row.try_get(idx)?),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            RowValues::Blob(row.try_get(idx)?)
        }
        _ => match row.try_get::<String, _>(idx) {
            Ok(text) => RowValues::Text(text),
            Err(_) => RowValues::Blob(row.try_get(idx)?),
        },
    };
    Ok(value)
}

/// Build a result set from fetched `MySQL` rows.
///
/// # Errors
/// Returns `ContactsDbError` if any value cannot be decoded.
pub fn build_result_set(rows: &[MySqlRow]) -> Result<ResultSet, ContactsDbError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    let Some(first) = rows.first() else {
        return Ok(result_set);
    };

    let column_names: Vec<String> = first
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let col_count = column_names.len();
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(mysql_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
