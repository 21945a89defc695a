//! # warden-core
//!
//! Core crate for Warden. Contains the collaborator traits the auth
//! subsystem is written against (counter store, credential store,
//! notification sender), configuration schemas, the credential domain
//! type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Warden crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
