//! Brute-force protection thresholds.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Failure thresholds, windows, and penalties for the user and IP tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Failed logins for one username before it is locked.
    #[serde(default = "default_user_max_attempts")]
    pub user_max_attempts: i64,
    /// Window in which user failures are counted, in seconds.
    #[serde(default = "default_user_window")]
    pub user_window_seconds: u64,
    /// How long a locked username stays locked, in seconds.
    #[serde(default = "default_user_lockout")]
    pub user_lockout_seconds: u64,
    /// Failed requests from one IP before it is blocked.
    #[serde(default = "default_ip_max_attempts")]
    pub ip_max_attempts: i64,
    /// Window in which IP failures are counted, in seconds.
    #[serde(default = "default_ip_window")]
    pub ip_window_seconds: u64,
    /// First IP block duration in seconds; doubles with every re-block.
    #[serde(default = "default_ip_backoff_base")]
    pub ip_backoff_base_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            user_max_attempts: default_user_max_attempts(),
            user_window_seconds: default_user_window(),
            user_lockout_seconds: default_user_lockout(),
            ip_max_attempts: default_ip_max_attempts(),
            ip_window_seconds: default_ip_window(),
            ip_backoff_base_seconds: default_ip_backoff_base(),
        }
    }
}

impl RateLimitConfig {
    /// Checks that every threshold and duration is positive.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.user_max_attempts <= 0 || self.ip_max_attempts <= 0 {
            return Err(AppError::configuration(
                "rate_limit attempt thresholds must be greater than zero",
            ));
        }
        let durations = [
            self.user_window_seconds,
            self.user_lockout_seconds,
            self.ip_window_seconds,
            self.ip_backoff_base_seconds,
        ];
        if durations.contains(&0) {
            return Err(AppError::configuration(
                "rate_limit windows and durations must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_user_max_attempts() -> i64 {
    10
}

fn default_user_window() -> u64 {
    15 * 60
}

fn default_user_lockout() -> u64 {
    30 * 60
}

fn default_ip_max_attempts() -> i64 {
    50
}

fn default_ip_window() -> u64 {
    10 * 60
}

fn default_ip_backoff_base() -> u64 {
    60
}
