//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use warden_core::error::AppError;

/// Runs `validator` rules and maps the first failure to a bad request.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate()
        .map_err(|e| AppError::bad_request(format!("Validation failed: {e}")))?;
    Ok(req)
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, max = 1024, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh token.
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Logout request body. The access token comes from the Authorization header.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    /// Refresh token to revoke alongside the access token.
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Forgot-password request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Account email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Reset-token check body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyResetTokenRequest {
    /// Token from the reset link.
    #[validate(length(min = 1))]
    pub token: String,
}

/// Password reset body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Token from the reset link.
    #[validate(length(min = 1))]
    pub token: String,
    /// New password. Policy is enforced by the auth service.
    #[validate(length(min = 1, max = 1024))]
    pub new_password: String,
}
