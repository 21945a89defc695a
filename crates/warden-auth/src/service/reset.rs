//! Password reset: request, verify, consume.

use std::net::IpAddr;

use tracing::{error, info, warn};

use warden_core::error::AppError;
use warden_core::result::AppResult;

use super::AuthService;

impl AuthService {
    /// Starts a reset for `email`.
    ///
    /// Always `Ok`, even for unknown addresses and store failures, so the
    /// response does not reveal whether an account exists. The email is sent
    /// in the background.
    pub async fn forget_password(&self, email: &str) -> AppResult<()> {
        let user = match self.users.find_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                info!("Password reset requested for unknown email");
                return Ok(());
            }
            Err(e) => {
                error!(error = %e, "Failed to look up user for password reset");
                return Ok(());
            }
        };

        let token = match self.resets.issue(user.id).await {
            Ok(token) => token,
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Failed to store password reset token");
                return Ok(());
            }
        };

        let mailer = self.mailer.clone();
        let to = user.email.clone();
        self.tasks.spawn("send_password_reset_email", async move {
            mailer.send_password_reset(&to, &token).await
        });

        info!(user_id = %user.id, "Password reset token issued");
        Ok(())
    }

    /// Checks that a reset token is live without consuming it.
    pub async fn verify_reset_token(&self, token: &str) -> AppResult<()> {
        match self.resets.lookup(token).await? {
            Some(_) => Ok(()),
            None => Err(AppError::invalid_reset_token()),
        }
    }

    /// Consumes a reset token and sets a new password.
    ///
    /// 1. Resolve the token
    /// 2. Enforce the password policy (the token survives a rejected password)
    /// 3. Consume the token; losing a concurrent race is the same generic error
    /// 4. Hash and store the new password
    /// 5. In the background, clear counters and send the confirmation email
    pub async fn reset_password(&self, token: &str, new_password: &str, ip: IpAddr) -> AppResult<()> {
        let user_id = self
            .resets
            .lookup(token)
            .await?
            .ok_or_else(AppError::invalid_reset_token)?;

        self.policy.validate(new_password)?;

        // The delete decides which concurrent caller wins.
        if !self.resets.consume(token).await? {
            warn!(user_id = %user_id, "Reset token consumed concurrently");
            return Err(AppError::invalid_reset_token());
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| e.context("find user"))?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Reset token for missing user");
                AppError::invalid_reset_token()
            })?;

        let hash = self.hasher.hash_password(new_password)?;
        self.users
            .update_password_hash(user.id, &hash)
            .await
            .map_err(|e| e.context("update password"))?;

        let limiter = self.limiter.clone();
        let username = user.username.clone();
        let ip_key = ip.to_string();
        self.tasks.spawn("clear_reset_counters", async move {
            limiter.clear_after_success(&username, &ip_key).await
        });

        let mailer = self.mailer.clone();
        let to = user.email.clone();
        self.tasks.spawn("send_password_changed_email", async move {
            mailer.send_password_changed(&to).await
        });

        info!(user_id = %user.id, ip = %ip, "Password reset completed");
        Ok(())
    }
}
