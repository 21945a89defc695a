//! # warden-api
//!
//! HTTP API layer for Warden built on Axum.
//!
//! Exposes the authentication flows under `/api/auth`, the IP gate that
//! sits in front of credential-accepting routes, the bearer-token
//! extractor, request/response DTOs, and the mapping from [`AppError`] to
//! HTTP responses.
//!
//! [`AppError`]: warden_core::AppError

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
