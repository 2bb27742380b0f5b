use crate::{
    Dialect, Query, Result, RowLabeled, RowsAffected,
    stream::{Stream, TryStreamExt},
};
use std::{future::Future, pin::pin};

/// A database handle: the only way the engine touches storage.
pub trait Executor: Send {
    /// Name of the SQL driver, possibly an alias (`pgx`, `mariadb`, ...).
    fn driver_name(&self) -> &str;

    /// Dialect of the handle, resolved from the driver name.
    fn dialect(&self) -> Dialect {
        Dialect::resolve(self.driver_name())
    }

    /// Execute the query and return the rows.
    fn fetch(&mut self, query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send;

    /// Execute the query and return the number of rows affected.
    fn execute(&mut self, query: Query) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Execute the query and return the first row, if any.
    fn fetch_one(
        &mut self,
        query: Query,
    ) -> impl Future<Output = Result<Option<RowLabeled>>> + Send {
        let stream = self.fetch(query);
        async move {
            let mut stream = pin!(stream);
            stream.try_next().await
        }
    }
}
