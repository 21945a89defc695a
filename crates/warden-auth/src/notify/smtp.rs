//! SMTP delivery through `lettre`.

use std::str::FromStr;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use warden_core::config::SmtpConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::traits::notifier::NotificationSender;

/// Sends HTML email over an authenticated SMTP relay.
pub struct SmtpSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSender")
            .field("from", &self.from.to_string())
            .finish()
    }
}

impl SmtpSender {
    /// Build the transport. Nothing is sent until the first message.
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let from = Mailbox::from_str(&format!("{} <{}>", config.from_name, config.from_email))
            .map_err(|e| AppError::configuration(format!("Invalid sender address: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AppError::configuration(format!("Invalid SMTP host: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl NotificationSender for SmtpSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::notification(format!("Invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| AppError::notification(format!("Failed to build email: {e}")))?;

        self.transport.send(message).await.map_err(|e| {
            AppError::with_source(ErrorKind::Notification, "Failed to send email", e)
        })?;

        debug!(subject = %subject, "Email handed to SMTP relay");
        Ok(())
    }
}
