use crate::{SqliteConfig, bind::bind_values, extract::extract_value};
use async_stream::try_stream;
use futures::TryStreamExt;
use sqlx::{Column, Row, SqlitePool};
use std::future::Future;
use stencil_core::{
    Connection, DRIVER_SQLITE3, Error, Executor, Query, Result, RowLabeled, RowNames,
    RowsAffected, stream::Stream, truncate_long,
};

/// Pool of SQLite connections, cloning it shares the pool.
#[derive(Debug, Clone)]
pub struct SqliteConnection {
    pool: SqlitePool,
}

impl SqliteConnection {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn driver_error(error: sqlx::Error, sql: &str) -> Error {
    let error = Error::new(error).context(format!(
        "While executing the query:\n{}",
        truncate_long!(sql)
    ));
    log::error!("{:#}", error);
    error
}

impl Executor for SqliteConnection {
    fn driver_name(&self) -> &str {
        DRIVER_SQLITE3
    }

    fn fetch(&mut self, query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send {
        let pool = self.pool.clone();
        try_stream! {
            let Query { sql, params } = query;
            let mut rows = bind_values(sqlx::query(&sql), params)?.fetch(&pool);
            let mut labels: Option<RowNames> = None;
            while let Some(row) = rows.try_next().await.map_err(|e| driver_error(e, &sql))? {
                let labels = labels
                    .get_or_insert_with(|| {
                        row.columns()
                            .iter()
                            .map(|c| c.name().to_owned())
                            .collect::<Vec<_>>()
                            .into()
                    })
                    .clone();
                let values = (0..row.len())
                    .map(|i| extract_value(&row, i))
                    .collect::<Result<Box<[_]>>>()?;
                yield RowLabeled::new(labels, values);
            }
        }
    }

    fn execute(&mut self, query: Query) -> impl Future<Output = Result<RowsAffected>> + Send {
        let pool = self.pool.clone();
        async move {
            let Query { sql, params } = query;
            let result = bind_values(sqlx::query(&sql), params)?
                .execute(&pool)
                .await
                .map_err(|e| driver_error(e, &sql))?;
            let rows_affected = result.rows_affected();
            Ok(RowsAffected {
                rows_affected,
                last_affected_id: (rows_affected > 0).then(|| result.last_insert_rowid()),
            })
        }
    }
}

impl Connection for SqliteConnection {
    async fn connect(url: &str) -> Result<SqliteConnection> {
        SqliteConfig::from_url(url)?.connect().await
    }
}
