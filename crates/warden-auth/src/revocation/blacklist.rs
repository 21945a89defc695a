//! Blacklist of revoked token ids, each kept only until its token would
//! have expired anyway.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use warden_cache::keys;
use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;

#[derive(Debug, Clone)]
pub struct TokenBlacklist {
    store: Arc<dyn CounterStore>,
}

impl TokenBlacklist {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Revoke `jti` for `remaining`. A zero duration is a no-op.
    pub async fn revoke(&self, jti: Uuid, remaining: Duration) -> AppResult<()> {
        if remaining.is_zero() {
            return Ok(());
        }
        self.store
            .set(&keys::token_blacklist(&jti.to_string()), "revoked", remaining)
            .await?;
        debug!(jti = %jti, ttl_seconds = remaining.as_secs(), "Token blacklisted");
        Ok(())
    }

    pub async fn is_revoked(&self, jti: Uuid) -> AppResult<bool> {
        self.store
            .exists(&keys::token_blacklist(&jti.to_string()))
            .await
    }
}
