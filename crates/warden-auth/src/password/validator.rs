//! Password policy enforcement for new passwords.

use warden_core::config::AuthConfig;
use warden_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, in characters.
    min_length: usize,
    /// Require upper, lower, digit and symbol.
    require_mixed: bool,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            require_mixed: config.password_require_mixed,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or a bad-request error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::bad_request(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !self.require_mixed {
            return Ok(());
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AppError::bad_request(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(AppError::bad_request(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
            return Err(AppError::bad_request(
                "Password must contain at least one special character",
            ));
        }

        Ok(())
    }
}
