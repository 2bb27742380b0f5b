use futures::TryFutureExt;
use std::{collections::VecDeque, future::Future};
use stencil::{
    Error, Executor, Query, Result, RowLabeled, RowsAffected,
    stream::{self, Stream},
};

/// What the next query sent to a [`RecordingExecutor`] produces.
#[derive(Debug)]
pub enum Response {
    Rows(Vec<RowLabeled>),
    Affected(RowsAffected),
    Error(Error),
    /// Never completes, the caller has to give up first.
    Pending,
}

impl Response {
    /// A single row.
    pub fn row<N: Into<String>, V: Into<stencil::Value>>(
        columns: impl IntoIterator<Item = (N, V)>,
    ) -> Self {
        Response::Rows(vec![columns.into_iter().collect()])
    }

    pub fn affected(rows_affected: u64, last_affected_id: Option<i64>) -> Self {
        Response::Affected(RowsAffected {
            rows_affected,
            last_affected_id,
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error(Error::msg(message.into()))
    }
}

/// In memory database handle: records every query and replays the queued responses in order.
#[derive(Debug)]
pub struct RecordingExecutor {
    driver_name: String,
    responses: VecDeque<Response>,
    queries: Vec<Query>,
}

impl RecordingExecutor {
    pub fn new(driver_name: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
            responses: VecDeque::new(),
            queries: Vec::new(),
        }
    }

    pub fn respond(mut self, response: Response) -> Self {
        self.push(response);
        self
    }

    pub fn push(&mut self, response: Response) {
        self.responses.push_back(response);
    }

    /// Every query received so far, oldest first.
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn last_query(&self) -> Option<&Query> {
        self.queries.last()
    }

    /// Number of queued responses not consumed yet.
    pub fn pending_responses(&self) -> usize {
        self.responses.len()
    }

    fn next(&mut self, query: Query) -> Response {
        log::trace!("Recording: {}", query);
        let response = self.responses.pop_front().unwrap_or_else(|| {
            Response::error(format!("no response queued for `{}`", query.sql()))
        });
        self.queries.push(query);
        response
    }
}

impl Executor for RecordingExecutor {
    fn driver_name(&self) -> &str {
        &self.driver_name
    }

    fn fetch(&mut self, query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send {
        let response = self.next(query);
        async move {
            match response {
                Response::Rows(rows) => Ok(stream::iter(rows.into_iter().map(Ok))),
                Response::Affected(..) => Err(Error::msg(
                    "a row count was queued but the query expects rows",
                )),
                Response::Error(error) => Err(error),
                Response::Pending => std::future::pending().await,
            }
        }
        .try_flatten_stream()
    }

    fn execute(&mut self, query: Query) -> impl Future<Output = Result<RowsAffected>> + Send {
        let response = self.next(query);
        async move {
            match response {
                Response::Affected(affected) => Ok(affected),
                Response::Rows(..) => Err(Error::msg(
                    "rows were queued but the query expects a row count",
                )),
                Response::Error(error) => Err(error),
                Response::Pending => std::future::pending().await,
            }
        }
    }
}
