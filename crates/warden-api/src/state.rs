//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use warden_auth::AuthService;
use warden_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Login, token, and reset flows
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Bundles the validated configuration with the auth service.
    pub fn new(config: AppConfig, auth: AuthService) -> Self {
        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
        }
    }
}
