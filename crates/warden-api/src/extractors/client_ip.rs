//! Client address used for IP rate limiting.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use warden_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller's IP address.
///
/// Taken from the socket peer, or from the first `X-Forwarded-For` hop when
/// `server.trust_forwarded_for` is set. A missing or unparseable header
/// falls back to the peer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.server.trust_forwarded_for {
            if let Some(ip) = forwarded_for(&parts.headers) {
                return Ok(ClientIp(ip));
            }
        }

        let ConnectInfo(addr) = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::internal(format!("Peer address unavailable: {e}")))?;
        Ok(ClientIp(addr.ip()))
    }
}

/// First (client-most) address in `X-Forwarded-For`.
fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", value.parse().unwrap());
        headers
    }

    #[test]
    fn test_first_hop_wins() {
        assert_eq!(
            forwarded_for(&headers("203.0.113.7, 10.0.0.1")),
            Some("203.0.113.7".parse().unwrap())
        );
    }

    #[test]
    fn test_ipv6_hop() {
        assert_eq!(
            forwarded_for(&headers("2001:db8::1")),
            Some("2001:db8::1".parse().unwrap())
        );
    }

    #[test]
    fn test_garbage_is_ignored() {
        assert_eq!(forwarded_for(&headers("unknown, 10.0.0.1")), None);
        assert_eq!(forwarded_for(&HeaderMap::new()), None);
    }
}
