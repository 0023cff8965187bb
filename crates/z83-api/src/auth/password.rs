//! Salted password hashing (bcrypt).

use std::sync::LazyLock;

use thiserror::Error;
use tracing::warn;

use crate::error::{ApiError, ApiResult};

/// bcrypt work factor. Embedded in every hash, so verification is
/// self-describing even if this changes later.
pub const BCRYPT_COST: u32 = 10;

/// bcrypt input limit in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password must be at most {MAX_PASSWORD_BYTES} bytes")]
    TooLong,

    #[error("Password hashing failed: {0}")]
    Hash(bcrypt::BcryptError),
}

impl From<bcrypt::BcryptError> for PasswordError {
    fn from(e: bcrypt::BcryptError) -> Self {
        match e {
            bcrypt::BcryptError::Truncation(_) => PasswordError::TooLong,
            other => PasswordError::Hash(other),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooLong => ApiError::validation(e.to_string()),
            PasswordError::Hash(_) => ApiError::internal(e.to_string()),
        }
    }
}

/// Hash a password with a fresh random salt. Passwords longer than
/// [`MAX_PASSWORD_BYTES`] are rejected, never truncated.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::non_truncating_hash(plaintext, BCRYPT_COST)?)
}

/// Check a candidate against a stored hash in constant time.
///
/// A mismatch, an over-long candidate and an unparseable stored hash all
/// yield `false`.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match bcrypt::non_truncating_verify(plaintext, stored_hash) {
        Ok(matches) => matches,
        Err(bcrypt::BcryptError::Truncation(_)) => false,
        Err(e) => {
            warn!(error = %e, "Stored password hash could not be parsed");
            false
        }
    }
}

/// Hash used when the account does not exist, so both login failure paths
/// pay for one bcrypt verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| bcrypt::hash("z83-dummy-password", BCRYPT_COST).ok());

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(plaintext: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| ApiError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// [`verify_password`] on the blocking pool. With no stored hash the
/// candidate is checked against a dummy hash and the result is always false.
pub async fn verify_password_blocking(plaintext: String, stored_hash: Option<String>) -> bool {
    let result = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&plaintext, &hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&plaintext, dummy);
            }
            false
        }
    })
    .await;

    match result {
        Ok(matches) => matches,
        Err(e) => {
            warn!(error = %e, "Password verification task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_original_password() {
        let hash = hash_password("p@ss1").unwrap();
        assert!(verify_password("p@ss1", &hash));
    }

    #[test]
    fn test_verify_rejects_other_password() {
        let hash = hash_password("p@ss1").unwrap();
        assert!(!verify_password("p@ss2", &hash));
        assert!(!verify_password("", &hash));
        assert!(!verify_password("P@SS1", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same password", &a));
        assert!(verify_password("same password", &b));
    }

    #[test]
    fn test_hash_embeds_cost_and_is_not_plaintext() {
        let hash = hash_password("p@ss1").unwrap();
        assert!(hash.starts_with("$2b$10$"));
        assert!(!hash.contains("p@ss1"));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!verify_password("p@ss1", "p@ss1"));
        assert!(!verify_password("p@ss1", ""));
    }

    #[test]
    fn test_long_password_is_rejected_not_truncated() {
        let at_limit = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hash_password(&at_limit).unwrap();
        assert!(verify_password(&at_limit, &hash));

        // 37 chars, 73 bytes
        let long = format!("{}a", "\u{e9}".repeat(36));
        assert!(matches!(hash_password(&long), Err(PasswordError::TooLong)));

        let prefix = "\u{e9}".repeat(36);
        let hash = hash_password(&prefix).unwrap();
        assert!(!verify_password(&format!("{}b", prefix), &hash));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hash = hash_password_blocking("secret".to_string()).await.unwrap();
        assert!(verify_password_blocking("secret".to_string(), Some(hash)).await);
        assert!(!verify_password_blocking("secret".to_string(), None).await);
    }
}
