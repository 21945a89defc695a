//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header, verifies it, and checks the blacklist.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use warden_auth::Claims;
use warden_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Verified access-token claims of the caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl std::ops::Deref for AuthUser {
    type Target = Claims;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("Missing or malformed Authorization header"))?;

        let claims = state.auth.verify_access_token(bearer.token()).await?;
        Ok(AuthUser(claims))
    }
}
