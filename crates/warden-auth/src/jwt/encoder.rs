//! JWT token creation with per-kind signing keys and lifetimes.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_core::config::AuthConfig;
use warden_core::error::AppError;

use super::claims::{Claims, TokenType};

/// `token_type` value reported to clients alongside a token pair.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: chrono::DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: chrono::DateTime<Utc>,
    /// Always `"Bearer"`.
    pub token_type: String,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// The configuration is expected to have passed [`AuthConfig::validate`].
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::minutes(config.refresh_ttl_minutes),
            issuer: config.issuer.clone(),
        }
    }

    /// Generates a new access + refresh token pair for the given user.
    pub fn generate_token_pair(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        let (access_token, access_expires_at) = self.generate(user_id, TokenType::Access)?;
        let (refresh_token, refresh_expires_at) = self.generate(user_id, TokenType::Refresh)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        })
    }

    /// Generates a single token of the given kind with a fresh `jti`.
    pub fn generate(
        &self,
        user_id: Uuid,
        token_type: TokenType,
    ) -> Result<(String, chrono::DateTime<Utc>), AppError> {
        let (key, ttl) = match token_type {
            TokenType::Access => (&self.access_key, self.access_ttl),
            TokenType::Refresh => (&self.refresh_key, self.refresh_ttl),
        };

        let now = Utc::now();
        let exp = now + ttl;
        let claims = Claims {
            sub: user_id,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, key).map_err(|e| {
            AppError::internal(format!("Failed to encode {token_type} token: {e}"))
        })?;

        Ok((token, exp))
    }
}
