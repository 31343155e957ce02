use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub mod media;
pub mod notes;
pub mod users;

/// Durable record store for the platform.
///
/// Thin accessor over Postgres; each method is a single-record transaction.
/// Any multi-step consistency (e.g. physical storage before record
/// creation) is sequenced by the callers, not here.
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::new_with_pool_config(database_url, 10, 2).await
    }

    pub async fn new_with_pool_config(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Retry transient pool/connection failures a few times before giving
    /// up. Query-level errors (constraint violations, bad SQL) are never
    /// retried.
    pub(crate) async fn with_retry<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        const MAX_ATTEMPTS: u32 = 3;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < MAX_ATTEMPTS && is_transient(&e) => {
                    warn!(
                        "database operation failed (attempt {}/{}), retrying: {}",
                        attempt, MAX_ATTEMPTS, e
                    );
                    tokio::time::sleep(Duration::from_millis(100 * u64::from(attempt))).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_transient(error: &anyhow::Error) -> bool {
    let message = error.to_string();
    message.contains("pool timed out")
        || message.contains("connection closed")
        || message.contains("connection reset")
        || message.contains("broken pipe")
}
