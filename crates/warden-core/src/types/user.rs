//! The credential view of a user account.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as the auth subsystem sees it.
///
/// The password hash is never serialized, so a `UserCredential` can be
/// returned from handlers as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredential {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Address used for reset and confirmation emails.
    pub email: String,
    /// Encoded password hash (PHC string).
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = UserCredential {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("alice@example.com"));
    }
}
