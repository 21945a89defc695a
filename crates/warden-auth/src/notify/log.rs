//! Sender that only logs, for development.

use async_trait::async_trait;
use tracing::info;

use warden_core::result::AppResult;
use warden_core::traits::notifier::NotificationSender;

/// Logs each message instead of delivering it. The body is never logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        info!(to = %to, subject = %subject, body_bytes = body.len(), "Email suppressed (log sender)");
        Ok(())
    }
}
