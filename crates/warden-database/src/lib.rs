//! # warden-database
//!
//! Credential store implementations for Warden: a PostgreSQL store backed
//! by a shared sqlx pool, and an in-memory store for development and tests.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{MemoryUserStore, PgUserStore};
