use sqlx::{Row, TypeInfo, ValueRef, sqlite::SqliteRow};
use stencil_core::{Error, Result, Value};

/// Decode a column by the storage class of the value actually stored.
pub(crate) fn extract_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_owned();
    Ok(match storage.as_str() {
        "INTEGER" | "BOOLEAN" => Value::Int64(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" | "NUMERIC" => Value::Float64(row.try_get_unchecked::<f64, _>(index)?),
        "TEXT" | "DATE" | "TIME" | "DATETIME" => {
            Value::Varchar(row.try_get_unchecked::<String, _>(index)?)
        }
        "BLOB" => Value::Blob(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => {
            return Err(Error::msg(format!(
                "Unexpected column type {} at index {}",
                storage, index
            )));
        }
    })
}
