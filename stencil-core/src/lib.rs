mod as_value;
mod cache;
mod column;
mod conflict;
mod connection;
mod context;
mod crud;
mod dialect;
mod entity;
mod error;
mod executor;
mod metadata;
mod query;
mod sql_writer;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use cache::*;
pub use column::*;
pub use conflict::*;
pub use connection::*;
pub use context::*;
pub use crud::*;
pub use dialect::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use metadata::*;
pub use query::*;
pub use sql_writer::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;
pub use ::tokio_util::sync::CancellationToken;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
