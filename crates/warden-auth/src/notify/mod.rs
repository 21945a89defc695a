//! Outbound account emails: templating and delivery.

pub mod log;
pub mod mailer;
pub mod smtp;

use std::sync::Arc;

use tracing::info;

use warden_core::config::NotificationConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::traits::notifier::NotificationSender;

pub use log::LogSender;
pub use mailer::Mailer;
pub use smtp::SmtpSender;

/// Build the sender selected by `notification.provider`.
pub fn build_sender(config: &NotificationConfig) -> AppResult<Arc<dyn NotificationSender>> {
    match config.provider.as_str() {
        "smtp" => {
            info!(host = %config.smtp.host, port = config.smtp.port, "Using SMTP notification sender");
            Ok(Arc::new(SmtpSender::new(&config.smtp)?))
        }
        "log" => {
            info!("Using log-only notification sender");
            Ok(Arc::new(LogSender))
        }
        other => Err(AppError::configuration(format!(
            "Unknown notification provider: '{other}'. Supported: log, smtp"
        ))),
    }
}
