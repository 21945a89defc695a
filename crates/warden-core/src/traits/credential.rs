//! Credential store trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;
use crate::types::UserCredential;

/// Read access to user credentials plus the single write the reset flow needs.
///
/// Lookups return `Ok(None)` for an unknown user; `Err` is reserved for
/// backend failures.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserCredential>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserCredential>>;

    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserCredential>>;

    /// Replace the stored password hash.
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
