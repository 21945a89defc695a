//! # warden-auth
//!
//! Authentication and abuse mitigation for Warden.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token issuance and verification
//! - `password`: Argon2id hashing, the dummy hash, and password policy
//! - `ratelimit`: failure counters, user lockout, exponential IP backoff
//! - `revocation`: blacklist of logged-out token ids
//! - `reset`: single-use password reset tokens
//! - `notify`: account email templates and senders
//! - `background`: detached, time-bounded bookkeeping tasks
//! - `service`: [`AuthService`], which ties the above into the public flows

pub mod background;
pub mod jwt;
pub mod notify;
pub mod password;
pub mod ratelimit;
pub mod reset;
pub mod revocation;
pub mod service;

pub use background::BackgroundTasks;
pub use jwt::{Claims, TokenIssuer, TokenPair, TokenType};
pub use password::{PasswordHasher, PasswordValidator};
pub use ratelimit::RateLimiter;
pub use service::{AuthService, HealthReport, LoginOutcome};
