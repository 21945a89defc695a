//! Key builders for every counter store entry Warden writes.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. The Redis provider adds its
//! configured prefix on top of these.

// ── Brute-force protection ─────────────────────────────────

/// Lockout flag for a user.
pub fn user_lock(username: &str) -> String {
    format!("lock:user:{username}")
}

/// Failure counter for a user.
pub fn user_attempts(username: &str) -> String {
    format!("attempts:user:{username}")
}

/// Active block for an IP.
pub fn ip_block(ip: &str) -> String {
    format!("block:ip:{ip}")
}

/// Failure counter for an IP.
pub fn ip_attempts(ip: &str) -> String {
    format!("attempts:ip:{ip}")
}

/// Number of times an IP has been blocked. Drives the backoff exponent.
pub fn ip_block_level(ip: &str) -> String {
    format!("blockcount:ip:{ip}")
}

// ── Tokens ─────────────────────────────────────────────────

/// Blacklist entry for a revoked token id.
pub fn token_blacklist(jti: &str) -> String {
    format!("blacklist:token:{jti}")
}

/// Pending password reset token.
pub fn password_reset(token: &str) -> String {
    format!("reset:password:{token}")
}
