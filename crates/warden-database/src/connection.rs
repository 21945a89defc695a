//! PostgreSQL pool for the credential store.
//!
//! Warden does not own the `users` table. At connect time the pool checks
//! that the table exposes the columns credential lookups read, so a
//! misconfigured database fails at startup instead of on the first login.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use warden_core::config::{DatabaseConfig, redact_url};
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;

/// Columns of `users` that credential lookups and password updates touch.
pub const REQUIRED_USER_COLUMNS: [&str; 4] = ["id", "username", "email", "password_hash"];

/// Shared sqlx pool used by [`PgUserStore`](crate::PgUserStore).
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open the pool and verify the `users` table.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        if config.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.provider is 'postgres'",
            ));
        }

        info!(
            url = %redact_url(&config.url),
            max_connections = config.max_connections,
            "Opening credential store pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Credential store unreachable", e)
            })?;

        let db = Self { pool };
        db.verify_user_table().await?;
        Ok(db)
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn verify_user_table(&self) -> AppResult<()> {
        let present: Vec<String> = sqlx::query_scalar(
            "SELECT column_name::text FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = 'users'",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to inspect users table", e))?;

        let missing = missing_columns(&present);
        if !missing.is_empty() {
            return Err(AppError::configuration(format!(
                "users table is missing columns: {}",
                missing.join(", ")
            )));
        }
        info!("Credential store schema verified");
        Ok(())
    }

    /// Runs `SELECT 1` on a pooled connection.
    pub async fn health_check(&self) -> AppResult<bool> {
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(one) => Ok(one == 1),
            Err(e) => {
                warn!(error = %e, idle = self.pool.num_idle(), "Credential store health check failed");
                Err(AppError::with_source(
                    ErrorKind::Database,
                    "Credential store health check failed",
                    e,
                ))
            }
        }
    }

    /// Close every pooled connection. Used during shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Credential store pool closed");
    }
}

fn missing_columns(present: &[String]) -> Vec<&'static str> {
    REQUIRED_USER_COLUMNS
        .into_iter()
        .filter(|required| !present.iter().any(|c| c.eq_ignore_ascii_case(required)))
        .collect()
}
