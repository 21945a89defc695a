//! Route definitions for the Warden HTTP API.
//!
//! All routes are mounted under `/api`. Credential-accepting routes sit
//! behind the IP gate.

use std::time::Duration;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so
/// the client IP is available to the gate and the handlers.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(gated_auth_routes(state.clone()))
        .merge(auth_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .nest("/api", api_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Login and password reset: rejected outright while the caller's IP is blocked.
fn gated_auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::ip_gate::ip_gate,
        ))
}

/// Token lifecycle endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/auth/verify-reset-token",
            post(handlers::auth::verify_reset_token),
        )
        .route("/auth/me", get(handlers::auth::me))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
