//! Password reset configuration.

use serde::{Deserialize, Serialize};

/// Password reset token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Reset token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
    /// Base URL of the frontend that hosts the reset form.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            token_ttl_seconds: default_token_ttl(),
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_token_ttl() -> u64 {
    15 * 60
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}
