mod accounts;
mod notes;
mod recording;

pub use accounts::{Account, StampedAccount};
pub use notes::Note;
pub use recording::*;

use crate::{
    accounts::{accounts, stamped_accounts},
    notes::notes,
};
use log::LevelFilter;
use std::env;
use stencil::{Executor, Query, StatementCache};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the driver agnostic scenarios against a live database.
///
/// `schema` holds the statements creating (or recreating) the tables `account` and `note` in the
/// dialect of the driver:
/// - `account`: `id` generated integer key, `email` unique text, `created_at` nullable timestamp
///   defaulting to the current time.
/// - `note`: primary key (`author`, `number`), `body` text, `pinned` boolean, `updated_at`
///   nullable timestamp.
pub async fn execute_tests<X: Executor>(mut executor: X, schema: &[&str]) {
    for statement in schema {
        executor
            .execute(Query::raw(*statement))
            .await
            .unwrap_or_else(|e| panic!("Failed to set up the schema with `{statement}`: {e:?}"));
    }
    let cache = StatementCache::new();
    accounts(&cache, &mut executor).await;
    stamped_accounts(&cache, &mut executor).await;
    notes(&cache, &mut executor).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
