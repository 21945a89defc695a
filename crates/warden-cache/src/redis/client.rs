//! Redis connection for the counter store.
//!
//! All Warden keys live under one prefix so several deployments can share a
//! Redis instance. The connection is checked with `PING` before the server
//! starts accepting logins.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use warden_core::config::cache::RedisCacheConfig;
use warden_core::config::redact_url;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;

/// Reconnecting Redis handle plus the key prefix.
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    key_prefix: String,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisClient {
    /// Connect and verify the server answers `PING`.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %redact_url(&config.url), prefix = %config.key_prefix, "Connecting counter store to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid cache.redis.url", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Counter store unreachable", e)
        })?;

        let client = Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        };
        if !client.ping().await? {
            return Err(AppError::cache("Counter store did not answer PING"));
        }
        Ok(client)
    }

    /// A handle for issuing commands. Clones share the same connection.
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// `key` under the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        prefixed(&self.key_prefix, key)
    }

    /// Whether the server answers `PING` with `PONG`.
    pub async fn ping(&self) -> AppResult<bool> {
        let mut conn = self.connection();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e))?;
        Ok(pong == "PONG")
    }
}

fn prefixed(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    #[test]
    fn test_counter_keys_live_under_prefix() {
        assert_eq!(
            prefixed("warden:", &keys::user_lock("alice")),
            "warden:lock:user:alice"
        );
        assert_eq!(prefixed("", "attempts:ip:10.0.0.1"), "attempts:ip:10.0.0.1");
    }

    #[tokio::test]
    async fn test_malformed_url_is_a_configuration_error() {
        let config = RedisCacheConfig {
            url: "not a redis url".to_string(),
            key_prefix: "warden:".to_string(),
        };
        let err = RedisClient::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
