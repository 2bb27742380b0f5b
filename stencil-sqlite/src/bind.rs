use sqlx::{Sqlite, query::Query, sqlite::SqliteArguments};
use stencil_core::{Context, Result, Value};
use time::macros::format_description;

pub(crate) type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Bind the parameters positionally. Types without a storage class of their own are sent as text.
pub(crate) fn bind_values<'q>(
    mut query: SqliteQuery<'q>,
    values: impl IntoIterator<Item = Value>,
) -> Result<SqliteQuery<'q>> {
    for value in values {
        query = bind_value(query, value)?;
    }
    Ok(query)
}

fn bind_value(query: SqliteQuery<'_>, value: Value) -> Result<SqliteQuery<'_>> {
    let context = || format!("Could not bind the parameter {}", value);
    Ok(match &value {
        Value::Null => query.bind(None::<i64>),
        Value::Boolean(v) => query.bind(*v),
        Value::Int64(v) => query.bind(*v),
        Value::Float64(v) => query.bind(*v),
        Value::Decimal(v) => query.bind(v.to_string()),
        Value::Varchar(v) => query.bind(v.clone()),
        Value::Blob(v) => query.bind(v.clone()),
        Value::Uuid(v) => query.bind(v.hyphenated().to_string()),
        Value::Date(v) => query.bind(
            v.format(format_description!("[year]-[month]-[day]"))
                .with_context(context)?,
        ),
        Value::Time(v) => query.bind(if v.nanosecond() == 0 {
            v.format(format_description!("[hour]:[minute]:[second]"))
        } else {
            v.format(format_description!("[hour]:[minute]:[second].[subsecond]"))
        }
        .with_context(context)?),
        Value::Timestamp(v) => query.bind(if v.nanosecond() == 0 {
            v.format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
        } else {
            v.format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"
            ))
        }
        .with_context(context)?),
        Value::TimestampWithTimezone(v) => query.bind(
            v.format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
            ))
            .with_context(context)?,
        ),
    })
}
