//! Login, refresh, logout, and access-token verification.

use std::net::IpAddr;

use tracing::{error, info, warn};

use warden_core::error::AppError;
use warden_core::result::AppResult;

use crate::jwt::{Claims, TokenPair};

use super::{AuthService, LoginOutcome};

impl AuthService {
    /// Performs the login flow:
    ///
    /// 1. Read the lockout flag (not acted on yet)
    /// 2. Look up the user
    /// 3. Pick the stored hash, or the dummy hash if the user is missing or locked
    /// 4. Compare, always
    /// 5. Succeed only for an existing, unlocked user with a matching password
    /// 6. On failure, count it against user and IP in the background
    /// 7. On success, clear counters in the background and issue tokens
    ///
    /// Every failure is the same [`AppError::invalid_credentials`].
    pub async fn login(&self, username: &str, password: &str, ip: IpAddr) -> AppResult<LoginOutcome> {
        let locked = self
            .limiter
            .is_user_locked(username)
            .await
            .map_err(|e| e.context("check lockout"))?;

        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(|e| e.context("find user"))?;

        let target = match &user {
            Some(user) if !locked => user.password_hash.as_str(),
            _ => self.hasher.dummy_hash(),
        };

        // Compare even when the user is missing or locked.
        let matched = match self.hasher.verify_password(password, target) {
            Ok(matched) => matched,
            Err(e) => {
                error!(username = %username, error = %e, "Stored password hash is unusable");
                false
            }
        };

        let user = match user {
            Some(user) if matched && !locked => user,
            _ => {
                info!(username = %username, ip = %ip, locked, "Login failed");

                let limiter = self.limiter.clone();
                let username = username.to_string();
                let ip_key = ip.to_string();
                self.tasks.spawn("record_login_failure", async move {
                    limiter.record_login_failure(&username, &ip_key).await
                });
                return Err(AppError::invalid_credentials());
            }
        };

        let limiter = self.limiter.clone();
        let username = user.username.clone();
        let ip_key = ip.to_string();
        self.tasks.spawn("clear_login_counters", async move {
            limiter.clear_after_success(&username, &ip_key).await
        });

        let tokens = self.issuer.issue(user.id)?;
        info!(user_id = %user.id, username = %user.username, ip = %ip, "Login successful");
        Ok(LoginOutcome { user, tokens })
    }

    /// Verifies a refresh token and issues a new pair for the same subject.
    ///
    /// The presented token stays valid unless `revoke_rotated_refresh_tokens`
    /// is enabled, in which case it is blacklisted for its remaining lifetime.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.issuer.verify_refresh(refresh_token)?;

        if self.blacklist.is_revoked(claims.jti).await? {
            warn!(user_id = %claims.sub, jti = %claims.jti, "Refresh with revoked token");
            return Err(AppError::invalid_token());
        }

        let user = self
            .users
            .find_by_id(claims.sub)
            .await
            .map_err(|e| e.context("find user"))?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "Refresh for unknown user");
                AppError::invalid_token()
            })?;

        if self.revoke_rotated_refresh_tokens {
            if let Some(remaining) = claims.remaining_ttl() {
                self.blacklist.revoke(claims.jti, remaining).await?;
            }
        }

        let tokens = self.issuer.issue(user.id)?;
        info!(user_id = %user.id, "Token refreshed");
        Ok(tokens)
    }

    /// Revokes the caller's access token and the matching refresh token.
    ///
    /// A refresh token that verifies but belongs to someone else is rejected
    /// and nothing is revoked. One that does not verify is skipped; the access
    /// token is still revoked. Tokens already past expiry are skipped.
    pub async fn logout(&self, access: &Claims, refresh_token: &str) -> AppResult<()> {
        let refresh = match self.issuer.verify_refresh(refresh_token) {
            Ok(claims) => Some(claims),
            Err(_) => {
                warn!(user_id = %access.sub, "Logout with unverifiable refresh token");
                None
            }
        };

        if let Some(refresh) = &refresh {
            if refresh.sub != access.sub {
                warn!(
                    access_user = %access.sub,
                    refresh_user = %refresh.sub,
                    "Logout attempt with mismatched tokens"
                );
                return Err(AppError::bad_request("Token mismatch"));
            }
        }

        if let Some(remaining) = access.remaining_ttl() {
            self.blacklist.revoke(access.jti, remaining).await?;
        }
        if let Some(refresh) = refresh {
            if let Some(remaining) = refresh.remaining_ttl() {
                self.blacklist.revoke(refresh.jti, remaining).await?;
            }
        }

        info!(user_id = %access.sub, "Logout successful");
        Ok(())
    }

    /// Verifies a bearer access token, then checks the blacklist.
    pub async fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.issuer.verify_access(token)?;
        if self.blacklist.is_revoked(claims.jti).await? {
            return Err(AppError::token_revoked());
        }
        Ok(claims)
    }
}
