//! # warden-cache
//!
//! Ephemeral counter store implementations for Warden. Supports two modes:
//!
//! - **memory**: In-process store on [dashmap](https://crates.io/crates/dashmap)
//!   with expiry measured on the tokio clock
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. Every call goes
//! through [`CounterManager`], which bounds it with the configured timeout.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CounterManager;
