use crate::{
    CrudError, Entity, Error, ExecContext, Executor, Metadata, Query, Result, RowsAffected,
    StatementCache, StatementKind, get_metadata,
};

fn not_found(metadata: &Metadata) -> Error {
    log::debug!("No such record in `{}`", metadata.table());
    CrudError::NotFound {
        table: metadata.table().to_owned(),
    }
    .into()
}

/// Run a row returning statement and scan its only row into `entity`.
async fn fetch_into<E: Entity, X: Executor>(
    executor: &mut X,
    context: &ExecContext,
    metadata: &Metadata,
    entity: &mut E,
    query: Query,
) -> Result<()> {
    match context.run(executor.fetch_one(query)).await? {
        Some(row) => entity.scan(row),
        None => Err(not_found(metadata)),
    }
}

/// Refresh `entity` from the row matching its primary key.
///
/// Fails with [`CrudError::NotFound`] when no row matches.
pub async fn load<E: Entity, X: Executor>(
    cache: &StatementCache,
    executor: &mut X,
    context: &ExecContext,
    entity: &mut E,
) -> Result<()> {
    context.check()?;
    let metadata = get_metadata::<E>()?;
    let statement = cache.statement::<E>(StatementKind::Select, executor.dialect())?;
    let query = statement.bind(&*entity)?;
    fetch_into(executor, context, metadata, entity, query).await
}

/// Insert `entity` and return the id generated by the database.
///
/// The id is `None` when the columns are returned into the entity instead, for PostgreSQL, or
/// when the driver does not report one.
pub async fn insert<E: Entity, X: Executor>(
    cache: &StatementCache,
    executor: &mut X,
    context: &ExecContext,
    entity: &mut E,
) -> Result<Option<i64>> {
    context.check()?;
    let metadata = get_metadata::<E>()?;
    let dialect = executor.dialect();
    let statement = cache.statement::<E>(StatementKind::Insert, dialect)?;
    let query = statement.bind(&*entity)?;
    if metadata.has_returning_insert() {
        fetch_into(executor, context, metadata, entity, query).await?;
        return Ok(None);
    }
    let affected = context.run(executor.execute(query)).await?;
    if !dialect.has_last_insert_id() {
        return Ok(None);
    }
    Ok(affected.last_affected_id)
}

/// Write every updatable column of `entity` into the row matching its primary key.
///
/// Fails with [`CrudError::NotFound`] when no row is affected.
pub async fn update<E: Entity, X: Executor>(
    cache: &StatementCache,
    executor: &mut X,
    context: &ExecContext,
    entity: &mut E,
) -> Result<()> {
    context.check()?;
    let metadata = get_metadata::<E>()?;
    let statement = cache.statement::<E>(StatementKind::Update, executor.dialect())?;
    let query = statement.bind(&*entity)?;
    if metadata.has_returning_update() {
        return fetch_into(executor, context, metadata, entity, query).await;
    }
    let affected = context.run(executor.execute(query)).await?;
    if affected.rows_affected == 0 {
        return Err(not_found(metadata));
    }
    Ok(())
}

/// Delete the row matching the primary key of `entity`. Deleting nothing is not an error.
pub async fn delete<E: Entity, X: Executor>(
    cache: &StatementCache,
    executor: &mut X,
    context: &ExecContext,
    entity: &E,
) -> Result<RowsAffected> {
    context.check()?;
    get_metadata::<E>()?;
    let statement = cache.statement::<E>(StatementKind::Delete, executor.dialect())?;
    let query = statement.bind(&*entity)?;
    context.run(executor.execute(query)).await
}
