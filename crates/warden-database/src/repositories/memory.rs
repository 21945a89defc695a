//! In-memory credential store for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::credential::UserStore;
use warden_core::types::UserCredential;

/// Credential store held in a concurrent map keyed by user id.
///
/// Username and email lookups are case-insensitive, matching the SQL store.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<DashMap<Uuid, UserCredential>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub fn insert(&self, user: UserCredential) {
        debug!(user_id = %user.id, username = %user.username, "Seeding user");
        self.users.insert(user.id, user);
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn find_by(&self, matches: impl Fn(&UserCredential) -> bool) -> Option<UserCredential> {
        self.users
            .iter()
            .find(|entry| matches(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserCredential>> {
        Ok(self.find_by(|u| u.username.eq_ignore_ascii_case(username)))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserCredential>> {
        Ok(self.find_by(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserCredential>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::database(format!("No user row updated for id {id}")))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserCredential {
        UserCredential {
            id: Uuid::new_v4(),
            username: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash-v1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lookups_are_case_insensitive() {
        let store = MemoryUserStore::new();
        let user = alice();
        store.insert(user.clone());

        assert_eq!(store.find_by_username("alice").await.unwrap(), Some(user.clone()));
        assert_eq!(
            store.find_by_email("ALICE@example.com").await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(store.find_by_id(user.id).await.unwrap(), Some(user));
        assert_eq!(store.find_by_username("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let store = MemoryUserStore::new();
        let user = alice();
        store.insert(user.clone());

        store.update_password_hash(user.id, "hash-v2").await.unwrap();
        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "hash-v2");

        assert!(store.update_password_hash(Uuid::new_v4(), "x").await.is_err());
    }
}
