//! Axum middleware stack.

pub mod cors;
pub mod ip_gate;
pub mod logging;
