//! Single-use password reset tokens.

pub mod tokens;

pub use tokens::ResetTokenStore;
