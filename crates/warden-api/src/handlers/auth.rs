//! Auth handlers: login, refresh, logout, password reset, me.

use axum::Json;
use axum::extract::State;

use warden_auth::TokenPair;

use crate::dto::request::{
    ForgotPasswordRequest, LoginRequest, LogoutRequest, RefreshRequest, ResetPasswordRequest,
    VerifyResetTokenRequest, validated,
};
use crate::dto::response::{ApiResponse, LoginResponse, MeResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ClientIp};
use crate::state::AppState;

/// Reply to every forgot-password request, whether or not the email exists.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent";

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let req = validated(req)?;
    let outcome = state.auth.login(&req.username, &req.password, ip).await?;

    Ok(Json(ApiResponse::ok(LoginResponse::new(
        outcome.user,
        outcome.tokens,
    ))))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<ApiResponse<TokenPair>>> {
    let req = validated(req)?;
    let tokens = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(tokens)))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogoutRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    state.auth.logout(&auth, &req.refresh_token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Logged out successfully",
    ))))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    state.auth.forget_password(&req.email).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        FORGOT_PASSWORD_MESSAGE,
    ))))
}

/// POST /api/auth/verify-reset-token
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Json(req): Json<VerifyResetTokenRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    state.auth.verify_reset_token(&req.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Reset token is valid",
    ))))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    let req = validated(req)?;
    state
        .auth
        .reset_password(&req.token, &req.new_password, ip)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password has been reset",
    ))))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<MeResponse>>> {
    let user = state.auth.current_user(auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(MeResponse {
        user: user.into(),
        token_expires_at: auth.expires_at(),
    })))
}
