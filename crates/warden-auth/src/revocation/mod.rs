//! Token revocation.

pub mod blacklist;

pub use blacklist::TokenBlacklist;
