use once_cell::sync::Lazy;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;
use tokio::time::sleep;

pub static DB_URL: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

pub static DB_CONNECT_MAX_ATTEMPTS: Lazy<u32> = Lazy::new(|| {
    env::var("DB_CONNECT_MAX_ATTEMPTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10)
});

pub static DB_CONNECT_BASE_DELAY_MS: Lazy<u64> = Lazy::new(|| {
    env::var("DB_CONNECT_BASE_DELAY_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(500)
});

/// Connects with a linear backoff so the service can start before a managed
/// database or a container network is ready. Returns the last error once
/// the attempts run out.
pub async fn connect_with_retry() -> Result<DatabaseConnection, DbErr> {
    let max_attempts = (*DB_CONNECT_MAX_ATTEMPTS).max(1);
    let base_delay_ms = *DB_CONNECT_BASE_DELAY_MS;

    tracing::info!(max_attempts, "connecting to database");
    let mut attempt = 1;
    loop {
        let mut options = ConnectOptions::new(DB_URL.as_str());
        options.sqlx_logging(false);

        match Database::connect(options).await {
            Ok(conn) => {
                tracing::info!(attempt, "database connected");
                return Ok(conn);
            }
            Err(e) if attempt < max_attempts => {
                let delay = base_delay_ms * u64::from(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay,
                    error = %e,
                    "database connection failed, retrying"
                );
                sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
