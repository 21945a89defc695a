//! Outbound email configuration.

use serde::{Deserialize, Serialize};

/// Notification delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Sender type: `"smtp"` or `"log"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// SMTP relay settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            smtp: SmtpConfig::default(),
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay host name.
    #[serde(default)]
    pub host: String,
    /// Relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP user.
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Display name of the sender.
    #[serde(default)]
    pub from_name: String,
    /// Sender address.
    #[serde(default)]
    pub from_email: String,
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_smtp_port() -> u16 {
    587
}
