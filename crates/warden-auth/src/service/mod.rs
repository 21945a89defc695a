//! The authentication service: login, token lifecycle, and password reset.
//!
//! [`AuthService`] owns every piece of the subsystem and is cheap to clone.
//! Handlers call it; nothing else talks to the stores directly.

mod login;
mod reset;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use warden_core::config::AppConfig;
use warden_core::result::AppResult;
use warden_core::traits::counter::CounterStore;
use warden_core::traits::credential::UserStore;
use warden_core::traits::notifier::NotificationSender;
use warden_core::types::UserCredential;

use crate::background::BackgroundTasks;
use crate::jwt::{TokenIssuer, TokenPair};
use crate::notify::Mailer;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::ratelimit::RateLimiter;
use crate::reset::ResetTokenStore;
use crate::revocation::TokenBlacklist;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// The authenticated user. The password hash is never serialized.
    pub user: UserCredential,
    /// Generated token pair.
    pub tokens: TokenPair,
}

/// Reachability of the two backing stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Counters, lockouts, blacklist, and reset tokens.
    pub counter_store: bool,
    /// User credentials.
    pub credential_store: bool,
}

impl HealthReport {
    /// Whether both stores answered.
    pub fn is_healthy(&self) -> bool {
        self.counter_store && self.credential_store
    }
}

/// Authentication and abuse-mitigation service.
#[derive(Clone)]
pub struct AuthService {
    /// Credential store.
    users: Arc<dyn UserStore>,
    /// Shared counter store, kept for health checks.
    counters: Arc<dyn CounterStore>,
    /// Token issuance and verification.
    issuer: TokenIssuer,
    /// Revoked token ids.
    blacklist: TokenBlacklist,
    /// User lockout and IP backoff.
    limiter: RateLimiter,
    /// Pending reset tokens.
    resets: ResetTokenStore,
    /// Argon2 hasher, also the source of the dummy hash.
    hasher: Arc<PasswordHasher>,
    /// Policy applied to new passwords.
    policy: PasswordValidator,
    /// Account emails.
    mailer: Mailer,
    /// Detached bookkeeping.
    tasks: BackgroundTasks,
    /// Blacklist the presented refresh token when it is rotated.
    revoke_rotated_refresh_tokens: bool,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .field("limiter", &self.limiter)
            .field(
                "revoke_rotated_refresh_tokens",
                &self.revoke_rotated_refresh_tokens,
            )
            .finish()
    }
}

impl AuthService {
    /// Wires the service over its three collaborators.
    ///
    /// Fails if the auth configuration is unusable (short or shared secrets,
    /// non-positive lifetimes, bad argon2 parameters).
    pub fn new(
        config: &AppConfig,
        users: Arc<dyn UserStore>,
        counters: Arc<dyn CounterStore>,
        notifier: Arc<dyn NotificationSender>,
    ) -> AppResult<Self> {
        Ok(Self {
            users,
            issuer: TokenIssuer::new(&config.auth)?,
            counters: counters.clone(),
            blacklist: TokenBlacklist::new(counters.clone()),
            limiter: RateLimiter::new(counters.clone(), config.rate_limit.clone()),
            resets: ResetTokenStore::new(
                counters,
                Duration::from_secs(config.reset.token_ttl_seconds),
            ),
            hasher: Arc::new(PasswordHasher::new(&config.auth.argon2)?),
            policy: PasswordValidator::new(&config.auth),
            mailer: Mailer::new(notifier, &config.reset),
            tasks: BackgroundTasks::new(Duration::from_secs(
                config.background.task_timeout_seconds,
            )),
            revoke_rotated_refresh_tokens: config.auth.revoke_rotated_refresh_tokens,
        })
    }

    /// The rate limiter, for the IP gate in front of sensitive endpoints.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// The password hasher, for seeding users with hashes the service accepts.
    pub fn password_hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Resolves the subject of a verified access token.
    ///
    /// A token whose user has since been removed is treated as invalid.
    pub async fn current_user(&self, user_id: uuid::Uuid) -> AppResult<UserCredential> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(|e| e.context("find current user"))?
            .ok_or_else(warden_core::error::AppError::invalid_token)
    }

    /// Checks both stores. A failing check is logged and reported as down.
    pub async fn health(&self) -> HealthReport {
        let counter_store = match self.counters.health_check().await {
            Ok(up) => up,
            Err(e) => {
                warn!(error = %e, "Counter store health check failed");
                false
            }
        };
        let credential_store = match self.users.health_check().await {
            Ok(up) => up,
            Err(e) => {
                warn!(error = %e, "Credential store health check failed");
                false
            }
        };
        HealthReport {
            counter_store,
            credential_store,
        }
    }

    /// Detached bookkeeping started by this service.
    pub fn background_tasks(&self) -> &BackgroundTasks {
        &self.tasks
    }
}
