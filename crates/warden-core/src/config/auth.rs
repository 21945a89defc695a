//! Token and password configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token issuance and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    #[serde(default)]
    pub access_secret: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: i64,
    /// HMAC secret for refresh tokens. Must differ from the access secret.
    #[serde(default)]
    pub refresh_secret: String,
    /// Refresh token lifetime in minutes.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_minutes: i64,
    /// `iss` claim written into and required from every token.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Minimum secret length in bytes, checked once at startup.
    #[serde(default = "default_min_secret_bytes")]
    pub min_secret_bytes: usize,
    /// Minimum length of a new password.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Require upper case, lower case, digit, and symbol in new passwords.
    #[serde(default = "default_true")]
    pub password_require_mixed: bool,
    /// Blacklist the presented refresh token when it is exchanged.
    #[serde(default)]
    pub revoke_rotated_refresh_tokens: bool,
    /// Argon2id cost parameters.
    #[serde(default)]
    pub argon2: Argon2Config,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Config {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            access_ttl_minutes: default_access_ttl(),
            refresh_secret: String::new(),
            refresh_ttl_minutes: default_refresh_ttl(),
            issuer: default_issuer(),
            min_secret_bytes: default_min_secret_bytes(),
            password_min_length: default_password_min(),
            password_require_mixed: true,
            revoke_rotated_refresh_tokens: false,
            argon2: Argon2Config::default(),
        }
    }
}

impl AuthConfig {
    /// Checks the token secrets and lifetimes.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, secret) in [
            ("access_secret", &self.access_secret),
            ("refresh_secret", &self.refresh_secret),
        ] {
            if secret.len() < self.min_secret_bytes {
                return Err(AppError::configuration(format!(
                    "auth.{name} must be at least {} bytes",
                    self.min_secret_bytes
                )));
            }
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "auth.access_secret and auth.refresh_secret must differ",
            ));
        }
        if self.access_ttl_minutes <= 0 || self.refresh_ttl_minutes <= 0 {
            return Err(AppError::configuration(
                "auth token lifetimes must be greater than zero",
            ));
        }
        if self.password_min_length == 0 {
            return Err(AppError::configuration(
                "auth.password_min_length must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_access_ttl() -> i64 {
    15
}

fn default_refresh_ttl() -> i64 {
    60 * 24 * 7
}

fn default_issuer() -> String {
    "warden-auth".to_string()
}

fn default_min_secret_bytes() -> usize {
    32
}

fn default_password_min() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
