//! Account email templates.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use warden_core::config::ResetConfig;
use warden_core::result::AppResult;
use warden_core::traits::notifier::NotificationSender;

pub const PASSWORD_RESET_SUBJECT: &str = "Reset Your Password";
pub const PASSWORD_CHANGED_SUBJECT: &str = "Your Password Has Been Changed";

/// Renders account emails and hands them to a [`NotificationSender`].
#[derive(Debug, Clone)]
pub struct Mailer {
    sender: Arc<dyn NotificationSender>,
    frontend_url: String,
    link_ttl: Duration,
}

impl Mailer {
    pub fn new(sender: Arc<dyn NotificationSender>, config: &ResetConfig) -> Self {
        Self {
            sender,
            frontend_url: config.frontend_url.trim_end_matches('/').to_string(),
            link_ttl: Duration::from_secs(config.token_ttl_seconds),
        }
    }

    /// Link the user follows to choose a new password.
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={token}", self.frontend_url)
    }

    pub async fn send_password_reset(&self, email: &str, token: &str) -> AppResult<()> {
        let minutes = (self.link_ttl.as_secs() / 60).max(1);
        let body = format!(
            r#"<p>Hello,</p>
<p>You requested a password reset. Click the link below to set a new password:</p>
<p><a href="{link}">Reset Password</a></p>
<p>This link is valid for {minutes} minutes.</p>
<p>If you did not request this, please ignore this email.</p>
"#,
            link = self.reset_link(token),
        );

        self.sender.send(email, PASSWORD_RESET_SUBJECT, &body).await?;
        info!("Password reset email dispatched");
        Ok(())
    }

    pub async fn send_password_changed(&self, email: &str) -> AppResult<()> {
        let body = r#"<p>Hello,</p>
<p>This is a confirmation that the password for your account has just been changed.</p>
<p>If you did not make this change, please contact our support team immediately.</p>
"#;

        self.sender.send(email, PASSWORD_CHANGED_SUBJECT, body).await?;
        info!("Password changed email dispatched");
        Ok(())
    }
}
