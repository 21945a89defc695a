//! Brute-force protection: failure counters, user lockout and IP backoff.

pub mod counter;
pub mod limiter;

pub use limiter::{IpFailure, RateLimiter};
