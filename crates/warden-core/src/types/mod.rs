//! Core type definitions used across the Warden workspace.

pub mod user;

pub use user::UserCredential;
