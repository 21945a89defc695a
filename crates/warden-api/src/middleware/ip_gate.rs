//! Rejects requests from blocked IPs before any credential work.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiResult;
use crate::extractors::ClientIp;
use crate::state::AppState;

/// IP gate for login and password-reset routes.
///
/// A blocked IP gets `429` with `Retry-After` set to the remaining block
/// time in whole seconds. Counter store failures let the request through.
pub async fn ip_gate(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    state.auth.rate_limiter().check_ip(&ip.to_string()).await?;
    Ok(next.run(request).await)
}
