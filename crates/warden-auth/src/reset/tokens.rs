//! Storage of pending reset tokens.
//!
//! A token is 32 bytes from the OS RNG, base64url-encoded without padding,
//! mapped to the owning user id. Consumption is a delete: only the caller
//! whose delete removed the entry may use it.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use tracing::warn;
use uuid::Uuid;

use warden_cache::keys;
use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;

/// Raw entropy per token.
const TOKEN_BYTES: usize = 32;

/// Encoded length of a well-formed token.
const TOKEN_LEN: usize = 43;

#[derive(Debug, Clone)]
pub struct ResetTokenStore {
    store: Arc<dyn CounterStore>,
    ttl: Duration,
}

impl ResetTokenStore {
    pub fn new(store: Arc<dyn CounterStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Lifetime of newly issued tokens.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn generate() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn is_well_formed(token: &str) -> bool {
        token.len() == TOKEN_LEN
            && token
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    /// Create and store a token for `user_id`.
    pub async fn issue(&self, user_id: Uuid) -> AppResult<String> {
        let token = Self::generate();
        self.store
            .set(&keys::password_reset(&token), &user_id.to_string(), self.ttl)
            .await?;
        Ok(token)
    }

    /// The user a live token belongs to. Does not consume it.
    pub async fn lookup(&self, token: &str) -> AppResult<Option<Uuid>> {
        if !Self::is_well_formed(token) {
            return Ok(None);
        }
        let Some(value) = self.store.get(&keys::password_reset(token)).await? else {
            return Ok(None);
        };
        match Uuid::parse_str(&value) {
            Ok(user_id) => Ok(Some(user_id)),
            Err(e) => {
                warn!(error = %e, "Discarding reset token entry with malformed user id");
                Ok(None)
            }
        }
    }

    /// Consume a token. Returns `true` only for the caller that removed it.
    pub async fn consume(&self, token: &str) -> AppResult<bool> {
        if !Self::is_well_formed(token) {
            return Ok(false);
        }
        self.store.delete(&keys::password_reset(token)).await
    }
}
