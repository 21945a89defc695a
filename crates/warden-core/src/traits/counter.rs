//! Counter store trait for pluggable ephemeral key-value backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Ephemeral key-value store with TTLs and atomic increments.
///
/// Backs failure counters, lockout flags, IP blocks, the token blacklist and
/// password reset tokens. Every single call must be atomic on its own; no
/// multi-key transactions are required.
#[async_trait]
pub trait CounterStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, replacing any previous value.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Returns `true` if this call removed a live entry.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Increment an integer value by 1, creating it at 1 without a TTL.
    /// Returns the new value.
    async fn incr(&self, key: &str) -> AppResult<i64>;

    /// Set the TTL on an existing key. Returns `false` if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Remaining lifetime of a key.
    ///
    /// `None` when the key is absent or carries no expiry.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
