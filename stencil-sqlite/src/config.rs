use crate::SqliteConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};
use stencil_core::{Context, Error, Result};
use url::Url;

/// Connection pool settings decoded from a `sqlite:` URL.
///
/// `max_connections` and `acquire_timeout` (seconds) are consumed here, every other query
/// parameter (`mode`, `cache`, ...) is left to sqlx. In memory databases always use one
/// connection that is never closed, a new connection would see an empty database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub in_memory: bool,
}

impl SqliteConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
    pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn from_url(url: &str) -> Result<Self> {
        let context = || format!("Error while decoding connection URL: `{}`", url);
        let mut parsed = Url::parse(url).with_context(context)?;
        if parsed.scheme() != "sqlite" {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `sqlite:`, found `{}:`",
                parsed.scheme()
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut max_connections = Self::DEFAULT_MAX_CONNECTIONS;
        let mut acquire_timeout = Self::DEFAULT_ACQUIRE_TIMEOUT;
        let mut forwarded = Vec::new();
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "max_connections" => {
                    max_connections = value
                        .parse::<u32>()
                        .ok()
                        .filter(|v| *v > 0)
                        .ok_or_else(|| {
                            Error::msg(format!(
                                "`max_connections` must be a positive integer, found `{}`",
                                value
                            ))
                        })
                        .with_context(context)?;
                }
                "acquire_timeout" => {
                    acquire_timeout = value
                        .parse::<u64>()
                        .map(Duration::from_secs)
                        .with_context(|| {
                            format!(
                                "`acquire_timeout` must be a number of seconds, found `{}`",
                                value
                            )
                        })
                        .with_context(context)?;
                }
                _ => forwarded.push((key.into_owned(), value.into_owned())),
            }
        }
        let in_memory = parsed.path().contains(":memory:")
            || forwarded.iter().any(|(k, v)| k == "mode" && v == "memory");
        parsed.set_query(None);
        if !forwarded.is_empty() {
            parsed.query_pairs_mut().extend_pairs(forwarded);
        }
        Ok(Self {
            url: parsed.into(),
            max_connections: if in_memory { 1 } else { max_connections },
            acquire_timeout,
            in_memory,
        })
    }

    pub async fn connect(&self) -> Result<SqliteConnection> {
        let context = || format!("Could not open the database `{}`", self.url);
        let options = SqliteConnectOptions::from_str(&self.url).with_context(context)?;
        let mut pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout);
        if self.in_memory {
            pool = pool.min_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = pool
            .connect_with(options)
            .await
            .with_context(context)
            .inspect_err(|e| log::error!("{:#}", e))?;
        log::debug!("Connected to `{}`", self.url);
        Ok(SqliteConnection::new(pool))
    }
}
