use crate::{Dialect, Entity, Metadata, Result, Statement, StatementKind, get_metadata};
use dashmap::{DashMap, mapref::entry::Entry};
use std::{any::TypeId, sync::Arc};

type CacheKey = (TypeId, Dialect);

/// Generated statements, one map per [`StatementKind`], keyed by entity type and dialect.
///
/// Create it once and share it (usually behind an `Arc`) with every caller. Entries are never
/// invalidated: the output of the builders only depends on the entity type and the dialect.
#[derive(Default, Debug)]
pub struct StatementCache {
    select: DashMap<CacheKey, Arc<Statement>>,
    insert: DashMap<CacheKey, Arc<Statement>>,
    update: DashMap<CacheKey, Arc<Statement>>,
    delete: DashMap<CacheKey, Arc<Statement>>,
}

impl StatementCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: StatementKind) -> &DashMap<CacheKey, Arc<Statement>> {
        match kind {
            StatementKind::Select => &self.select,
            StatementKind::Insert => &self.insert,
            StatementKind::Update => &self.update,
            StatementKind::Delete => &self.delete,
        }
    }

    /// Statement of `kind` for entity `E`, built on first use.
    pub fn statement<E: Entity>(
        &self,
        kind: StatementKind,
        dialect: Dialect,
    ) -> Result<Arc<Statement>> {
        if let Some(statement) = self.get(kind, TypeId::of::<E>(), dialect) {
            return Ok(statement);
        }
        self.get_or_build(kind, dialect, get_metadata::<E>()?)
    }

    /// Return the cached statement or build it from `metadata`.
    ///
    /// The vacant entry stays locked during the build, concurrent callers of the same key wait
    /// for it and observe the same statement.
    pub fn get_or_build(
        &self,
        kind: StatementKind,
        dialect: Dialect,
        metadata: &Metadata,
    ) -> Result<Arc<Statement>> {
        match self.map(kind).entry((metadata.entity(), dialect)) {
            Entry::Occupied(entry) => {
                log::trace!(
                    "Cache hit for the {} statement of `{}`",
                    kind,
                    metadata.entity_name()
                );
                Ok(entry.get().clone())
            }
            Entry::Vacant(entry) => {
                let statement = Arc::new(Statement::build(kind, metadata, dialect)?);
                log::debug!(
                    "Built the {} statement of `{}` for the {} dialect: {}",
                    kind,
                    metadata.entity_name(),
                    dialect,
                    statement.text()
                );
                entry.insert(statement.clone());
                Ok(statement)
            }
        }
    }

    /// Cached statement, without building it.
    pub fn get(
        &self,
        kind: StatementKind,
        entity: TypeId,
        dialect: Dialect,
    ) -> Option<Arc<Statement>> {
        let statement = self.map(kind).get(&(entity, dialect))?.value().clone();
        log::trace!("Cache hit for a {} statement", kind);
        Some(statement)
    }

    /// Number of cached statements across all kinds.
    pub fn len(&self) -> usize {
        StatementKind::ALL
            .iter()
            .map(|kind| self.map(*kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        StatementKind::ALL
            .iter()
            .all(|kind| self.map(*kind).is_empty())
    }

    pub fn clear(&self) {
        for kind in StatementKind::ALL {
            self.map(kind).clear();
        }
    }

    /// Build ahead of time every statement entity `E` supports in `dialect`.
    ///
    /// Kinds the metadata cannot support (no primary key, nothing to update) are skipped, the
    /// first metadata error is returned only when not even one statement could be built.
    pub fn warm_up<E: Entity>(&self, dialect: Dialect) -> Result<usize> {
        let metadata = get_metadata::<E>()?;
        let mut built = 0;
        let mut first_error = None;
        for kind in StatementKind::ALL {
            match self.get_or_build(kind, dialect, metadata) {
                Ok(..) => built += 1,
                Err(error) => {
                    log::debug!(
                        "Skipping the {} statement of `{}`: {:#}",
                        kind,
                        metadata.entity_name(),
                        error
                    );
                    first_error.get_or_insert(error);
                }
            }
        }
        match first_error {
            Some(error) if built == 0 => Err(error),
            _ => Ok(built),
        }
    }
}
