//! Shared harness for auth scenario tests.

#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use warden_auth::AuthService;
use warden_cache::memory::MemoryCounterStore;
use warden_core::config::cache::MemoryCacheConfig;
use warden_core::config::{AppConfig, Argon2Config};
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;
use warden_core::traits::notifier::NotificationSender;
use warden_core::types::UserCredential;
use warden_database::MemoryUserStore;

/// A password that satisfies the default policy.
pub const PASSWORD: &str = "Corr3ct!horse";

/// Captures every email instead of sending it.
#[derive(Debug, Default)]
pub struct Outbox {
    sent: Mutex<Vec<SentMail>>,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Outbox {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    /// Pull the reset token out of the most recent reset email.
    pub fn last_reset_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let mail = sent.iter().rev().find(|m| m.subject == "Reset Your Password")?;
        let start = mail.body.find("token=")? + "token=".len();
        let token: String = mail.body[start..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        Some(token)
    }
}

#[async_trait]
impl NotificationSender for Outbox {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Memory counter store with switchable faults.
///
/// `fail_writes` makes `set` fail like an unreachable backend.
/// `yield_each_op` yields to the scheduler before every call so concurrent
/// tasks interleave between reads and writes.
#[derive(Debug)]
pub struct FaultyCounterStore {
    inner: MemoryCounterStore,
    pub fail_writes: AtomicBool,
    pub yield_each_op: AtomicBool,
}

impl FaultyCounterStore {
    fn new() -> Self {
        Self {
            inner: MemoryCounterStore::new(&MemoryCacheConfig::default()),
            fail_writes: AtomicBool::new(false),
            yield_each_op: AtomicBool::new(false),
        }
    }

    async fn pause(&self) {
        if self.yield_each_op.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl CounterStore for FaultyCounterStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.pause().await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.pause().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::cache("Redis error: connection refused"));
        }
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        self.pause().await;
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.pause().await;
        self.inner.exists(key).await
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        self.pause().await;
        self.inner.incr(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.pause().await;
        self.inner.expire(key, ttl).await
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        self.pause().await;
        self.inner.ttl(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

pub struct TestAuth {
    pub service: AuthService,
    pub users: MemoryUserStore,
    pub counters: Arc<FaultyCounterStore>,
    pub outbox: Arc<Outbox>,
    pub config: AppConfig,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.access_secret = "test-access-secret-0123456789abcdef".to_string();
    config.auth.refresh_secret = "test-refresh-secret-0123456789abcdef".to_string();
    config.auth.argon2 = Argon2Config {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };
    config
}

impl TestAuth {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let users = MemoryUserStore::new();
        let counters = Arc::new(FaultyCounterStore::new());
        let outbox = Arc::new(Outbox::default());
        let service = AuthService::new(
            &config,
            Arc::new(users.clone()),
            counters.clone(),
            outbox.clone(),
        )
        .unwrap();

        Self {
            service,
            users,
            counters,
            outbox,
            config,
        }
    }

    pub fn create_user(&self, username: &str, password: &str) -> UserCredential {
        let user = UserCredential {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: self.service.password_hasher().hash_password(password).unwrap(),
        };
        self.users.insert(user.clone());
        user
    }

    /// Wait for detached bookkeeping to finish.
    pub async fn settle(&self) {
        assert!(
            self.service
                .background_tasks()
                .drain(Duration::from_secs(30))
                .await,
            "background tasks did not finish"
        );
    }

    pub async fn counter(&self, key: &str) -> Option<String> {
        self.counters.get(key).await.unwrap()
    }

    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        self.counters.ttl(key).await.unwrap()
    }
}

pub fn ip(addr: &str) -> IpAddr {
    addr.parse().unwrap()
}
