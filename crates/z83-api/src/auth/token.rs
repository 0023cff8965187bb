//! Signed session tokens (HS256 JWT).

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use z83_models::{AccountId, Role};

use crate::config::AuthConfig;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub id: AccountId,
    pub email: String,
    pub role: Role,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signing and verification keys, derived once from the process secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenKeys {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: chrono::Duration::from_std(config.token_ttl)
                .unwrap_or_else(|_| chrono::Duration::hours(1)),
        }
    }

    /// Issue a token for a verified account, valid from now for the configured TTL.
    pub fn issue(&self, id: AccountId, email: &str, role: Role) -> Result<IssuedToken, TokenError> {
        self.issue_at(id, email, role, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        id: AccountId,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            id,
            email: email.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry, returning the payload.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::JwtSecret;

    const SECRET: &str = "test-signing-secret-with-enough-bytes!";

    fn keys() -> TokenKeys {
        TokenKeys::new(&AuthConfig::new(JwtSecret::new(SECRET).unwrap()))
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys();
        let issued = keys.issue(AccountId(7), "jane@x.com", Role::Applicant).unwrap();
        let claims = keys.verify(&issued.token).unwrap();

        assert_eq!(claims.id, AccountId(7));
        assert_eq!(claims.email, "jane@x.com");
        assert_eq!(claims.role, Role::Applicant);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = keys();
        let issued = keys
            .issue_at(
                AccountId(7),
                "jane@x.com",
                Role::Applicant,
                Utc::now() - chrono::Duration::hours(2),
            )
            .unwrap();

        assert!(matches!(keys.verify(&issued.token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tokens_differ_across_issuance_times() {
        let keys = keys();
        let now = Utc::now();
        let a = keys.issue_at(AccountId(7), "jane@x.com", Role::Applicant, now).unwrap();
        let b = keys
            .issue_at(
                AccountId(7),
                "jane@x.com",
                Role::Applicant,
                now + chrono::Duration::seconds(1),
            )
            .unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let keys = keys();
        let issued = keys.issue(AccountId(7), "jane@x.com", Role::Applicant).unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();
        assert_eq!(parts.len(), 3);

        // Flip every position of the payload segment in turn
        let payload = parts[1].as_bytes();
        for i in 0..payload.len() {
            let mut altered = payload.to_vec();
            altered[i] = if altered[i] == b'A' { b'B' } else { b'A' };
            let altered = String::from_utf8(altered).unwrap();
            if altered == parts[1] {
                continue;
            }
            let token = format!("{}.{}.{}", parts[0], altered, parts[2]);
            assert!(
                matches!(keys.verify(&token), Err(TokenError::Invalid(_))),
                "altered payload at byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let other = TokenKeys::new(&AuthConfig::new(
            JwtSecret::new("another-signing-secret-with-enough-bytes").unwrap(),
        ));
        let issued = other.issue(AccountId(7), "jane@x.com", Role::Admin).unwrap();
        assert!(matches!(keys().verify(&issued.token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let keys = keys();
        assert!(matches!(keys.verify(""), Err(TokenError::Invalid(_))));
        assert!(matches!(keys.verify("not.a.jwt"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_unknown_role_rejected() {
        #[derive(Serialize)]
        struct LooseClaims<'a> {
            id: i64,
            email: &'a str,
            role: &'a str,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &LooseClaims { id: 7, email: "jane@x.com", role: "superadmin", iat: now, exp: now + 60 },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(keys().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_custom_ttl() {
        let mut config = AuthConfig::new(JwtSecret::new(SECRET).unwrap());
        config.token_ttl = Duration::from_secs(60);
        let keys = TokenKeys::new(&config);
        let claims = keys
            .verify(&keys.issue(AccountId(1), "a@x.com", Role::Admin).unwrap().token)
            .unwrap();
        assert_eq!(claims.exp - claims.iat, 60);
    }
}
