//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and environment variables. Each sub-module represents a
//! logical configuration section.

pub mod app;
pub mod auth;
pub mod background;
pub mod cache;
pub mod database;
pub mod logging;
pub mod notification;
pub mod rate_limit;
pub mod redact;
pub mod reset;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{Argon2Config, AuthConfig};
pub use self::background::BackgroundConfig;
pub use self::cache::{CacheConfig, MemoryCacheConfig, RedisCacheConfig};
pub use self::database::{DatabaseConfig, SeedUser};
pub use self::logging::LoggingConfig;
pub use self::notification::{NotificationConfig, SmtpConfig};
pub use self::rate_limit::RateLimitConfig;
pub use self::redact::redact_url;
pub use self::reset::ResetConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Built once at startup, validated, and then shared immutably.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Counter store settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Brute-force protection settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Password reset settings.
    #[serde(default)]
    pub reset: ResetConfig,
    /// Outbound email settings.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Background task settings.
    #[serde(default)]
    pub background: BackgroundConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay and
    /// environment variables prefixed with `WARDEN__`
    /// (e.g. `WARDEN__AUTH__ACCESS_SECRET`), then validates the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WARDEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section. Called once at startup.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.rate_limit.validate()?;

        if self.reset.token_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "reset.token_ttl_seconds must be greater than zero",
            ));
        }
        if self.cache.operation_timeout_ms == 0 {
            return Err(AppError::configuration(
                "cache.operation_timeout_ms must be greater than zero",
            ));
        }
        if self.background.task_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "background.task_timeout_seconds must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.access_secret = "a".repeat(32);
        config.auth.refresh_secret = "r".repeat(32);
        config
    }

    #[test]
    fn test_defaults_match_documented_thresholds() {
        let config = AppConfig::default();
        assert_eq!(config.rate_limit.user_max_attempts, 10);
        assert_eq!(config.rate_limit.user_window_seconds, 900);
        assert_eq!(config.rate_limit.user_lockout_seconds, 1800);
        assert_eq!(config.rate_limit.ip_max_attempts, 50);
        assert_eq!(config.rate_limit.ip_window_seconds, 600);
        assert_eq!(config.rate_limit.ip_backoff_base_seconds, 60);
        assert_eq!(config.reset.token_ttl_seconds, 900);
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = valid();
        config.auth.refresh_secret = "short".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_rejects_shared_secret() {
        let mut config = valid();
        config.auth.refresh_secret = config.auth.access_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = valid();
        config.rate_limit.ip_window_seconds = 0;
        assert!(config.validate().is_err());
    }
}
