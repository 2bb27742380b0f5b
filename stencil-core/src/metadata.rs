use crate::{ColumnDef, CrudError, Entity, Result};
use std::{any::TypeId, borrow::Cow, collections::HashSet};

/// Static per-type descriptor of an entity: table, ordered columns and primary key.
///
/// Built once per entity type (usually behind a `LazyLock` generated by `#[derive(Entity)]`)
/// and never mutated afterwards.
#[derive(Debug)]
pub struct Metadata {
    entity: TypeId,
    entity_name: &'static str,
    table: Cow<'static, str>,
    columns: Vec<ColumnDef>,
    primary_keys: Vec<usize>,
    has_returning_insert: bool,
    has_returning_update: bool,
}

impl Metadata {
    /// Describe entity type `T` stored in `table` (possibly `schema.table`).
    pub fn new<T: 'static>(table: impl Into<Cow<'static, str>>, columns: Vec<ColumnDef>) -> Self {
        let primary_keys = columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.primary_key.then_some(i))
            .collect();
        Self {
            entity: TypeId::of::<T>(),
            entity_name: std::any::type_name::<T>(),
            table: table.into(),
            has_returning_insert: columns.iter().any(|c| c.returning_insert),
            has_returning_update: columns.iter().any(|c| c.returning_update),
            columns,
            primary_keys,
        }
    }

    /// Identity of the described type, the key of every statement cache.
    pub fn entity(&self) -> TypeId {
        self.entity
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Primary key columns in declaration order.
    pub fn primary_keys(&self) -> impl ExactSizeIterator<Item = &ColumnDef> + Clone {
        self.primary_keys.iter().map(|&i| &self.columns[i])
    }

    pub fn has_returning_insert(&self) -> bool {
        self.has_returning_insert
    }

    pub fn has_returning_update(&self) -> bool {
        self.has_returning_update
    }

    /// Check the descriptor is usable at all.
    pub fn validate(&self) -> Result<()> {
        if self.table.trim().is_empty() {
            return Err(self.error("the table name is empty"));
        }
        if self.columns.is_empty() {
            return Err(self.error("no columns are declared"));
        }
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if column.name.is_empty() {
                return Err(self.error("a column has an empty name"));
            }
            if !seen.insert(column.name()) {
                return Err(self.error(format!("column `{}` is declared twice", column.name)));
            }
        }
        Ok(())
    }

    /// Operations addressing a single row need at least one primary key column.
    pub fn require_primary_key(&self) -> Result<()> {
        if self.primary_keys.is_empty() {
            return Err(self.error("no primary key is declared"));
        }
        Ok(())
    }

    pub(crate) fn error(&self, reason: impl Into<Cow<'static, str>>) -> crate::Error {
        CrudError::Metadata {
            entity: self.entity_name,
            reason: reason.into(),
        }
        .into()
    }
}

/// Resolve and validate the descriptor of entity type `E`.
pub fn get_metadata<E: Entity>() -> Result<&'static Metadata> {
    let metadata = E::metadata();
    if metadata.entity() != TypeId::of::<E>() {
        return Err(metadata.error(format!(
            "the descriptor was built for `{}`",
            metadata.entity_name()
        )));
    }
    metadata.validate()?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_metadata_error;

    struct Order;

    #[test]
    fn precomputed_flags_and_keys() {
        let metadata = Metadata::new::<Order>(
            "shop.order",
            vec![
                ColumnDef::new("tenant").primary_key(),
                ColumnDef::new("number").primary_key(),
                ColumnDef::new("total"),
                ColumnDef::new("updated_at").returning_update(),
            ],
        );
        assert_eq!(metadata.entity(), TypeId::of::<Order>());
        assert_eq!(metadata.table(), "shop.order");
        assert_eq!(
            metadata.primary_keys().map(ColumnDef::name).collect::<Vec<_>>(),
            ["tenant", "number"]
        );
        assert!(!metadata.has_returning_insert());
        assert!(metadata.has_returning_update());
        assert!(metadata.validate().is_ok());
        assert!(metadata.require_primary_key().is_ok());
    }

    #[test]
    fn invalid_descriptors() {
        let metadata = Metadata::new::<Order>("order", vec![]);
        assert!(is_metadata_error(&metadata.validate().unwrap_err()));

        let metadata = Metadata::new::<Order>(" ", vec![ColumnDef::new("a")]);
        assert!(metadata.validate().is_err());

        let metadata =
            Metadata::new::<Order>("order", vec![ColumnDef::new("a"), ColumnDef::new("a")]);
        let error = metadata.validate().unwrap_err();
        assert!(format!("{error}").contains("column `a` is declared twice"));

        let metadata = Metadata::new::<Order>("order", vec![ColumnDef::new("a")]);
        assert!(metadata.validate().is_ok());
        assert!(is_metadata_error(&metadata.require_primary_key().unwrap_err()));
    }
}
