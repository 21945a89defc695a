//! Redis counter store provider.

pub mod client;
pub mod operations;

pub use client::RedisClient;
pub use operations::RedisCounterStore;
