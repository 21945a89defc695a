//! Unified application error types for Warden.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. Only the kind and
//! [`AppError::public_message`] ever leave the process; the full message and
//! source chain are for server-side logs.

use std::fmt;
use thiserror::Error;

/// Message returned for every failed login, whatever the underlying reason.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Message returned for any token that fails verification.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Message returned for a valid token whose id has been blacklisted.
pub const TOKEN_REVOKED_MESSAGE: &str = "Token has been logged out";

/// Message returned for unknown, expired, or already consumed reset tokens.
pub const INVALID_RESET_TOKEN_MESSAGE: &str = "Invalid or expired reset token";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Login failed. Covers unknown user, wrong password, and locked account.
    InvalidCredentials,
    /// Bad, expired, or revoked token.
    Unauthorized,
    /// The caller's IP is currently blocked.
    RateLimited,
    /// Malformed or unacceptable input (invalid reset token, weak password,
    /// mismatched logout tokens).
    BadRequest,
    /// An internal server error occurred.
    Internal,
    /// The counter store failed.
    Cache,
    /// The credential store failed.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// Sending a notification failed.
    Notification,
    /// A collaborator call exceeded its deadline.
    Timeout,
}

impl ErrorKind {
    /// Whether this kind is an infrastructure failure that must be reported
    /// as a generic internal error at the API boundary.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Internal
                | Self::Cache
                | Self::Database
                | Self::Configuration
                | Self::Serialization
                | Self::Notification
                | Self::Timeout
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Cache => write!(f, "CACHE"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Notification => write!(f, "NOTIFICATION"),
            Self::Timeout => write!(f, "TIMEOUT"),
        }
    }
}

/// The unified application error used throughout Warden.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Seconds the caller should wait before retrying (rate limiting only).
    pub retry_after: Option<u64>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
            source: Some(Box::new(source)),
        }
    }

    /// The single login failure. Always carries the same message.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, INVALID_CREDENTIALS_MESSAGE)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// The generic token verification failure.
    pub fn invalid_token() -> Self {
        Self::unauthorized(INVALID_TOKEN_MESSAGE)
    }

    /// A signature-valid token that was revoked by logout.
    pub fn token_revoked() -> Self {
        Self::unauthorized(TOKEN_REVOKED_MESSAGE)
    }

    /// Create a rate-limit error carrying the remaining block time.
    pub fn rate_limited(retry_after_seconds: u64) -> Self {
        Self {
            retry_after: Some(retry_after_seconds),
            ..Self::new(ErrorKind::RateLimited, "Too many requests")
        }
    }

    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// The generic reset-token failure.
    pub fn invalid_reset_token() -> Self {
        Self::bad_request(INVALID_RESET_TOKEN_MESSAGE)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a counter store error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a credential store error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a notification error.
    pub fn notification(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Notification, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Prefix the message with the operation that failed, keeping kind and source.
    pub fn context(mut self, operation: &str) -> Self {
        self.message = format!("{operation}: {}", self.message);
        self
    }

    /// The message that is safe to show to a client.
    pub fn public_message(&self) -> &str {
        if self.kind.is_internal() {
            "Internal server error"
        } else {
            &self.message
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            retry_after: self.retry_after,
            source: None,
        }
    }
}

impl PartialEq for AppError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.message == other.message
            && self.retry_after == other.retry_after
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_is_always_identical() {
        assert_eq!(AppError::invalid_credentials(), AppError::invalid_credentials());
        assert_eq!(
            AppError::invalid_credentials().public_message(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[test]
    fn test_internal_kinds_hide_details() {
        let err = AppError::cache("Redis error: connection refused").context("incr attempts");
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.message.starts_with("incr attempts: "));

        let err = AppError::bad_request("Token mismatch");
        assert_eq!(err.public_message(), "Token mismatch");
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let err = AppError::rate_limited(120);
        assert_eq!(err.kind, ErrorKind::RateLimited);
        assert_eq!(err.retry_after, Some(120));
    }
}
