//! Per-user lockout and per-IP exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use warden_cache::keys;
use warden_core::config::RateLimitConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;

use super::counter::record_failure;

/// Marker value stored under lock and block keys.
const FLAG: &str = "1";

/// Upper bound on a single IP block.
pub const MAX_BLOCK: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Outcome of recording one failure against an IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpFailure {
    /// Whether this failure triggered a new block.
    pub blocked: bool,
    /// Length of the block just applied, if any.
    pub retry_after: Option<Duration>,
}

/// Tracks login failures per user and per IP and decides when to lock or block.
///
/// Usernames are lower-cased before they become part of a key, so the
/// counters follow the case-insensitive credential lookup.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Creates a limiter over the given counter store.
    pub fn new(store: Arc<dyn CounterStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    fn user_key(username: &str) -> String {
        username.to_lowercase()
    }

    /// Block length for the given block level: `base * 2^(level - 1)`,
    /// saturating at [`MAX_BLOCK`].
    pub fn block_duration(&self, level: i64) -> Duration {
        let exponent = u32::try_from(level.max(1) - 1).unwrap_or(u32::MAX);
        let factor = 2u64.checked_pow(exponent).unwrap_or(u64::MAX);
        let secs = self.config.ip_backoff_base_seconds.saturating_mul(factor);
        Duration::from_secs(secs).min(MAX_BLOCK)
    }

    // ── User track ─────────────────────────────────────────

    /// Whether the user currently carries a lockout flag.
    pub async fn is_user_locked(&self, username: &str) -> AppResult<bool> {
        self.store
            .exists(&keys::user_lock(&Self::user_key(username)))
            .await
    }

    /// Record a failed login for a user. Returns `true` if this failure locked
    /// the account.
    pub async fn record_user_failure(&self, username: &str) -> AppResult<bool> {
        let user = Self::user_key(username);
        let attempts_key = keys::user_attempts(&user);
        let window = Duration::from_secs(self.config.user_window_seconds);

        let attempts = record_failure(self.store.as_ref(), &attempts_key, window).await?;
        if attempts < self.config.user_max_attempts {
            return Ok(false);
        }

        let lockout = Duration::from_secs(self.config.user_lockout_seconds);
        self.store.set(&keys::user_lock(&user), FLAG, lockout).await?;
        self.store.delete(&attempts_key).await?;

        warn!(
            username = %user,
            attempts,
            lockout_seconds = lockout.as_secs(),
            "User locked after repeated login failures"
        );
        Ok(true)
    }

    /// Forget a user's failure count.
    pub async fn clear_user_attempts(&self, username: &str) -> AppResult<()> {
        self.store
            .delete(&keys::user_attempts(&Self::user_key(username)))
            .await?;
        Ok(())
    }

    // ── IP track ───────────────────────────────────────────

    /// Record a failed attempt from an IP, escalating the block on threshold.
    pub async fn record_ip_failure(&self, ip: &str) -> AppResult<IpFailure> {
        let attempts_key = keys::ip_attempts(ip);
        let window = Duration::from_secs(self.config.ip_window_seconds);

        let attempts = record_failure(self.store.as_ref(), &attempts_key, window).await?;
        if attempts < self.config.ip_max_attempts {
            return Ok(IpFailure {
                blocked: false,
                retry_after: None,
            });
        }

        let level = self.store.incr(&keys::ip_block_level(ip)).await?;
        let duration = self.block_duration(level);
        self.store.set(&keys::ip_block(ip), FLAG, duration).await?;
        self.store.delete(&attempts_key).await?;

        warn!(
            ip = %ip,
            attempts,
            level,
            block_seconds = duration.as_secs(),
            "IP blocked after repeated failures"
        );
        Ok(IpFailure {
            blocked: true,
            retry_after: Some(duration),
        })
    }

    /// Remaining block time for an IP, if it is blocked.
    pub async fn ip_block_remaining(&self, ip: &str) -> AppResult<Option<Duration>> {
        self.store.ttl(&keys::ip_block(ip)).await
    }

    /// Gate for sensitive endpoints.
    ///
    /// Rejects with [`AppError::rate_limited`] while the IP is blocked. A store
    /// failure lets the request through and is logged.
    pub async fn check_ip(&self, ip: &str) -> AppResult<()> {
        match self.ip_block_remaining(ip).await {
            Ok(Some(remaining)) if !remaining.is_zero() => {
                // Round up so a client never retries a fraction too early.
                let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
                info!(ip = %ip, retry_after = secs, "Request rejected: IP blocked");
                Err(AppError::rate_limited(secs))
            }
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(ip = %ip, error = %e, "IP block check failed, allowing request");
                Ok(())
            }
        }
    }

    /// Forget an IP's failure count.
    pub async fn clear_ip_attempts(&self, ip: &str) -> AppResult<()> {
        self.store.delete(&keys::ip_attempts(ip)).await?;
        Ok(())
    }

    /// Reset an IP's backoff level.
    pub async fn clear_ip_block_level(&self, ip: &str) -> AppResult<()> {
        self.store.delete(&keys::ip_block_level(ip)).await?;
        Ok(())
    }

    // ── Combined bookkeeping ───────────────────────────────

    /// Record a failed login against both tracks. Both are attempted even if
    /// the first fails; the first error is returned.
    pub async fn record_login_failure(&self, username: &str, ip: &str) -> AppResult<()> {
        let user = self.record_user_failure(username).await;
        let ip = self.record_ip_failure(ip).await;
        user?;
        ip?;
        Ok(())
    }

    /// Clear the user's attempts and the IP's attempts and block level after a
    /// successful login or password reset. Every step is attempted; the first
    /// error is returned.
    pub async fn clear_after_success(&self, username: &str, ip: &str) -> AppResult<()> {
        let results = [
            self.clear_user_attempts(username).await,
            self.clear_ip_attempts(ip).await,
            self.clear_ip_block_level(ip).await,
        ];
        results.into_iter().collect()
    }
}
