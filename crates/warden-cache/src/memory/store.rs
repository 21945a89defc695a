//! In-memory counter store on `dashmap`, with expiry on the tokio clock.
//!
//! Expiry is measured with [`tokio::time::Instant`], so tests can drive
//! windows and lockouts with `tokio::time::pause` and `advance`. Expired
//! entries are dropped lazily on access and swept in bulk once the map
//! grows past the configured threshold, at most once per sweep interval.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use tokio::time::Instant;
use tracing::debug;

use warden_core::config::cache::MemoryCacheConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

/// `None` when the deadline is beyond what the clock can represent.
fn deadline(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl)
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-memory counter store for single-node deployments and tests.
#[derive(Debug, Clone)]
pub struct MemoryCounterStore {
    entries: Arc<DashMap<String, Entry>>,
    sweep_threshold: usize,
    sweep_interval: Duration,
    last_sweep: Arc<Mutex<Instant>>,
}

impl MemoryCounterStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            sweep_threshold: config.sweep_threshold,
            sweep_interval: Duration::from_secs(config.sweep_interval_seconds),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries once the map has grown past the threshold and
    /// the previous sweep is at least one interval old. A writer that finds
    /// another sweep in progress skips it.
    ///
    /// Must not be called while holding a reference into the map.
    fn maybe_sweep(&self) {
        if self.entries.len() <= self.sweep_threshold {
            return;
        }
        let now = Instant::now();
        {
            let Ok(mut last) = self.last_sweep.try_lock() else {
                return;
            };
            if now.saturating_duration_since(*last) < self.sweep_interval {
                return;
            }
            *last = now;
        }
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        debug!(
            removed = before.saturating_sub(self.entries.len()),
            "Swept expired counter entries"
        );
    }

    fn live(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        let entry = self.entries.get(key)?.clone();
        if entry.is_live(now) {
            Some(entry)
        } else {
            self.entries.remove_if(key, |_, e| !e.is_live(now));
            None
        }
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live(key).map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.maybe_sweep();
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: deadline(Instant::now(), ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| entry.is_live(now)))
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live(key).is_some())
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        self.maybe_sweep();
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if !entry.is_live(now) {
                    *entry = Entry {
                        value: "1".to_string(),
                        expires_at: None,
                    };
                    return Ok(1);
                }
                let current: i64 = entry.value.parse().map_err(|_| {
                    AppError::cache(format!("Value at '{key}' is not an integer"))
                })?;
                let next = current.checked_add(1).ok_or_else(|| {
                    AppError::cache(format!("Increment would overflow at '{key}'"))
                })?;
                entry.value = next.to_string();
                Ok(next)
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry {
                    value: "1".to_string(),
                    expires_at: None,
                });
                Ok(1)
            }
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now) => {
                entry.expires_at = deadline(now, ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let now = Instant::now();
        Ok(self
            .live(key)
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
