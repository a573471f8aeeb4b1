use crate::core::config::DatabaseConfig;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub async fn create_pool(config: &DatabaseConfig, url: &str) -> Result<PgPool, sqlx::Error> {
    let mut options = PgConnectOptions::from_str(url)?;
    if config.require_ssl {
        options = options.ssl_mode(PgSslMode::Require);
    }

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_with(options)
        .await
}

/// Round-trip to the store and return its clock
pub async fn check_connection(pool: &PgPool) -> Result<DateTime<Utc>, sqlx::Error> {
    sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
        .fetch_one(pool)
        .await
}

/// Errors after which the pool cannot serve any further request
pub fn is_pool_fatal(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::PoolClosed | sqlx::Error::Configuration(_)
    )
}

/// Process-wide signal raised when the connection pool is beyond recovery.
///
/// The entry point waits on it next to Ctrl-C and exits non-zero once tripped.
#[derive(Clone, Default)]
pub struct FatalSignal {
    notify: Arc<Notify>,
    tripped: Arc<AtomicBool>,
}

impl FatalSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self, reason: &str) {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            tracing::error!("Database pool failed fatally: {}", reason);
            self.notify.notify_one();
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    pub async fn tripped(&self) {
        if self.is_tripped() {
            return;
        }
        self.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_fatal_classification() {
        assert!(is_pool_fatal(&sqlx::Error::PoolClosed));
        assert!(!is_pool_fatal(&sqlx::Error::PoolTimedOut));
        assert!(!is_pool_fatal(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn test_fatal_signal_wakes_waiter() {
        let signal = FatalSignal::new();
        let waiter = signal.clone();
        let handle = tokio::spawn(async move { waiter.tripped().await });

        signal.trip("pool closed");
        signal.trip("pool closed again");

        tokio_test::assert_ok!(handle.await);
        assert!(signal.is_tripped());
    }
}
