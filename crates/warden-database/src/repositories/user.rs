//! PostgreSQL credential store.

use async_trait::async_trait;
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::credential::UserStore;
use warden_core::types::UserCredential;

use crate::connection::DatabasePool;

/// Columns read for every credential lookup.
const CREDENTIAL_COLUMNS: &str = "id, username, email, password_hash";

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
}

impl From<CredentialRow> for UserCredential {
    fn from(row: CredentialRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

/// Credential lookups against the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    db: DatabasePool,
}

impl PgUserStore {
    /// Create a new store on a shared pool.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserCredential>> {
        let sql = format!("SELECT {CREDENTIAL_COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)");
        sqlx::query_as::<_, CredentialRow>(&sql)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await
            .map(|row| row.map(UserCredential::from))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserCredential>> {
        let sql = format!("SELECT {CREDENTIAL_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, CredentialRow>(&sql)
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
            .map(|row| row.map(UserCredential::from))
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserCredential>> {
        let sql = format!("SELECT {CREDENTIAL_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, CredentialRow>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map(|row| row.map(UserCredential::from))
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update password hash", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::database(format!(
                "No user row updated for id {id}"
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
