use crate::{Error, Metadata, Result, RowLabeled, Value};
use anyhow::Context;
use std::any;

/// A typed record bound to one table row.
///
/// Instead of runtime reflection every entity exposes an explicit binding table: reading a column
/// value by name (used to bind statement parameters) and writing one back (used to scan result
/// rows). Implementations are usually generated by `#[derive(Entity)]` but can be written by hand:
///
/// ```rust
/// use std::sync::LazyLock;
/// use stencil_core::{AsValue, ColumnDef, Entity, Error, Metadata, Result, Value};
///
/// struct Tag {
///     id: i64,
///     label: String,
/// }
///
/// impl Entity for Tag {
///     fn metadata() -> &'static Metadata {
///         static METADATA: LazyLock<Metadata> = LazyLock::new(|| {
///             Metadata::new::<Tag>(
///                 "tag",
///                 vec![ColumnDef::new("id").primary_key(), ColumnDef::new("label")],
///             )
///         });
///         &METADATA
///     }
///     fn value(&self, column: &str) -> Option<Value> {
///         match column {
///             "id" => Some(self.id.as_value()),
///             "label" => Some(self.label.clone().as_value()),
///             _ => None,
///         }
///     }
///     fn set_value(&mut self, column: &str, value: Value) -> Result<()> {
///         match column {
///             "id" => self.id = AsValue::try_from_value(value)?,
///             "label" => self.label = AsValue::try_from_value(value)?,
///             _ => return Err(Error::msg(format!("unknown column `{column}`"))),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    /// Structural descriptor of the type, see [`get_metadata`](crate::get_metadata).
    fn metadata() -> &'static Metadata
    where
        Self: Sized;

    /// Current value of the field mapped to `column`, `None` if there is no such column.
    fn value(&self, column: &str) -> Option<Value>;

    /// Overwrite the field mapped to `column`.
    fn set_value(&mut self, column: &str, value: Value) -> Result<()>;

    /// Every column value in metadata order.
    fn row(&self) -> RowLabeled
    where
        Self: Sized,
    {
        Self::metadata()
            .columns()
            .iter()
            .map(|c| (c.name().to_owned(), self.value(c.name()).unwrap_or_default()))
            .collect()
    }

    /// Write every column of `row` into the entity, columns not in the row are left untouched.
    fn scan(&mut self, row: RowLabeled) -> Result<()>
    where
        Self: Sized,
    {
        for (label, value) in row {
            self.set_value(&label, value).with_context(|| {
                format!(
                    "scanning result into entity `{}` failed",
                    any::type_name::<Self>()
                )
            })?;
        }
        Ok(())
    }
}

/// Error returned by generated bindings for a column that does not exist.
pub fn missing_column<E: Entity>(column: &str) -> Error {
    Error::msg(format!(
        "missing destination name `{}` in entity `{}`",
        column,
        any::type_name::<E>()
    ))
}
