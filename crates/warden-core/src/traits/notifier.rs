//! Outbound notification trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Delivers a rendered message to a single recipient.
#[async_trait]
pub trait NotificationSender: Send + Sync + std::fmt::Debug + 'static {
    /// Send `body` with `subject` to `to`.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}
