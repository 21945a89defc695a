//! Counter manager that dispatches to the configured provider.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use warden_core::config::cache::CacheConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;

/// Counter manager that wraps the configured counter store provider.
///
/// The provider is selected at construction time based on configuration.
/// Every operation is bounded by `operation_timeout`; a call that exceeds it
/// fails with [`ErrorKind::Timeout`](warden_core::ErrorKind::Timeout).
#[derive(Debug, Clone)]
pub struct CounterManager {
    /// The inner provider.
    inner: Arc<dyn CounterStore>,
    /// Deadline for each individual call.
    operation_timeout: Duration,
}

impl CounterManager {
    /// Create a new counter manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn CounterStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis counter store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCounterStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory counter store");
                Arc::new(crate::memory::MemoryCounterStore::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self {
            inner,
            operation_timeout: Duration::from_millis(config.operation_timeout_ms),
        })
    }

    /// Create a counter manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CounterStore>, operation_timeout: Duration) -> Self {
        Self {
            inner: provider,
            operation_timeout,
        }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn CounterStore {
        self.inner.as_ref()
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<T>> + Send,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(result) => result.map_err(|e| e.context(operation)),
            Err(_) => Err(AppError::timeout(format!(
                "{operation}: counter store did not answer within {}ms",
                self.operation_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl CounterStore for CounterManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.bounded("set", self.inner.set(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        self.bounded("incr", self.inner.incr(key)).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.bounded("expire", self.inner.expire(key, ttl)).await
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        self.bounded("ttl", self.inner.ttl(key)).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.bounded("health_check", self.inner.health_check()).await
    }
}
