//! Token issuer: validated keys plus issue, verify and re-issue.

use uuid::Uuid;

use warden_core::config::AuthConfig;
use warden_core::result::AppResult;

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::{JwtEncoder, TokenPair};

/// Issues and verifies access/refresh tokens.
///
/// Construction enforces the secret and lifetime rules once, so no call
/// site re-checks them.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenIssuer {
    /// Build an issuer, rejecting short or shared secrets and non-positive
    /// lifetimes.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        })
    }

    /// Issue a fresh access + refresh pair for `user_id`.
    pub fn issue(&self, user_id: Uuid) -> AppResult<TokenPair> {
        self.encoder.generate_token_pair(user_id)
    }

    /// Verify an access token.
    pub fn verify_access(&self, token: &str) -> AppResult<Claims> {
        self.decoder.decode_access_token(token)
    }

    /// Verify a refresh token.
    pub fn verify_refresh(&self, token: &str) -> AppResult<Claims> {
        self.decoder.decode_refresh_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::TokenType;
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use warden_core::ErrorKind;
    use warden_core::error::INVALID_TOKEN_MESSAGE;

    fn config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret-access-secret-0123".to_string(),
            refresh_secret: "refresh-secret-refresh-secret-01".to_string(),
            ..AuthConfig::default()
        }
    }

    fn forge(secret: &str, alg: Algorithm, claims: &Claims) -> String {
        encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(token_type: TokenType, exp_offset: i64, iss: &str) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            iss: iss.to_string(),
            iat: now,
            exp: now + exp_offset,
            jti: Uuid::new_v4(),
            token_type,
        }
    }

    fn assert_generic_rejection(result: AppResult<Claims>) {
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, INVALID_TOKEN_MESSAGE);
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let issuer = TokenIssuer::new(&config()).unwrap();
        let user_id = Uuid::new_v4();
        let pair = issuer.issue(user_id).unwrap();

        let access = issuer.verify_access(&pair.access_token).unwrap();
        let refresh = issuer.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(refresh.sub, user_id);
        assert_ne!(access.jti, refresh.jti);
        assert_eq!(access.iss, "warden-auth");
        assert!(pair.refresh_expires_at > pair.access_expires_at);
        assert_eq!(pair.token_type, "Bearer");
    }

    #[test]
    fn test_each_issue_gets_new_jti() {
        let issuer = TokenIssuer::new(&config()).unwrap();
        let user_id = Uuid::new_v4();
        let a = issuer.verify_access(&issuer.issue(user_id).unwrap().access_token).unwrap();
        let b = issuer.verify_access(&issuer.issue(user_id).unwrap().access_token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_kinds_are_not_interchangeable() {
        let issuer = TokenIssuer::new(&config()).unwrap();
        let pair = issuer.issue(Uuid::new_v4()).unwrap();
        assert_generic_rejection(issuer.verify_access(&pair.refresh_token));
        assert_generic_rejection(issuer.verify_refresh(&pair.access_token));
    }

    #[test]
    fn test_wrong_type_claim_under_right_key_is_rejected() {
        let config = config();
        let issuer = TokenIssuer::new(&config).unwrap();
        let token = forge(
            &config.access_secret,
            Algorithm::HS256,
            &claims(TokenType::Refresh, 600, "warden-auth"),
        );
        assert_generic_rejection(issuer.verify_access(&token));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = config();
        let issuer = TokenIssuer::new(&config).unwrap();
        let token = forge(
            &config.access_secret,
            Algorithm::HS256,
            &claims(TokenType::Access, -60, "warden-auth"),
        );
        assert_generic_rejection(issuer.verify_access(&token));
    }

    #[test]
    fn test_wrong_signature_algorithm_and_issuer_are_rejected() {
        let config = config();
        let issuer = TokenIssuer::new(&config).unwrap();
        let good = claims(TokenType::Access, 600, "warden-auth");

        let wrong_key = forge("some-other-secret-some-other-sec", Algorithm::HS256, &good);
        assert_generic_rejection(issuer.verify_access(&wrong_key));

        let wrong_alg = forge(&config.access_secret, Algorithm::HS512, &good);
        assert_generic_rejection(issuer.verify_access(&wrong_alg));

        let wrong_iss = forge(
            &config.access_secret,
            Algorithm::HS256,
            &claims(TokenType::Access, 600, "someone-else"),
        );
        assert_generic_rejection(issuer.verify_access(&wrong_iss));

        assert_generic_rejection(issuer.verify_access("not-a-jwt"));
    }

    #[test]
    fn test_construction_rejects_weak_config() {
        let mut short = config();
        short.access_secret = "too-short".to_string();
        assert_eq!(
            TokenIssuer::new(&short).unwrap_err().kind,
            ErrorKind::Configuration
        );

        let mut zero = config();
        zero.access_ttl_minutes = 0;
        assert!(TokenIssuer::new(&zero).is_err());

        let mut shared = config();
        shared.refresh_secret = shared.access_secret.clone();
        assert!(TokenIssuer::new(&shared).is_err());
    }
}
