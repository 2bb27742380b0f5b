use crate::{Executor, Result};
use std::future::Future;

pub trait Connection: Executor + Sized {
    /// Create a connection pool with at least one connection established to the given URL
    fn connect(url: &str) -> impl Future<Output = Result<Self>>;
}
