//! Custom Axum extractors.

pub mod auth;
pub mod client_ip;

pub use auth::AuthUser;
pub use client_ip::ClientIp;
