//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_auth::{HealthReport, TokenPair};
use warden_core::types::UserCredential;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// User info.
    pub user: UserResponse,
}

impl LoginResponse {
    /// Combines the authenticated user with the issued tokens.
    pub fn new(user: UserCredential, tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
            token_type: tokens.token_type,
            user: user.into(),
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
}

impl From<UserCredential> for UserResponse {
    fn from(user: UserCredential) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Caller profile plus access-token expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// User info.
    #[serde(flatten)]
    pub user: UserResponse,
    /// When the presented access token expires.
    pub token_expires_at: DateTime<Utc>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a static message.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every store answered, otherwise `"degraded"`.
    pub status: String,
    /// Version.
    pub version: String,
    /// Per-store status, `"up"` or `"down"`.
    pub checks: HealthChecks,
}

/// Per-store health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    /// Counter store status.
    pub counter_store: String,
    /// Credential store status.
    pub credential_store: String,
}

fn up_or_down(up: bool) -> String {
    if up { "up" } else { "down" }.to_string()
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            status: if report.is_healthy() { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: HealthChecks {
                counter_store: up_or_down(report.counter_store),
                credential_store: up_or_down(report.credential_store),
            },
        }
    }
}
