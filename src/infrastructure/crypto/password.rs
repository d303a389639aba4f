//! Password hashing utilities
//!
//! bcrypt embeds the salt and cost in the digest, so nothing besides the
//! digest string needs to be stored.

use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;
use tracing::{debug, warn};

/// Cost used when none is configured.
pub const DEFAULT_HASH_COST: u32 = DEFAULT_COST;
/// Lowest cost bcrypt accepts.
pub const MIN_HASH_COST: u32 = 4;
/// Highest cost bcrypt accepts.
pub const MAX_HASH_COST: u32 = 31;
/// bcrypt only reads this many bytes of input; longer passwords are refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Task(String),
    #[error("password must be at most {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }
    Ok(hash(password, cost)?)
}

/// Verify a password against a stored digest.
///
/// Returns `false` for a wrong password, for a password longer than
/// [`MAX_PASSWORD_BYTES`] and for a digest bcrypt cannot parse.
pub fn verify_password(password: &str, digest: &str) -> bool {
    if password.len() > MAX_PASSWORD_BYTES {
        return false;
    }
    match verify(password, digest) {
        Ok(matches) => matches,
        Err(e) => {
            debug!(error = %e, "Stored password digest could not be verified");
            false
        }
    }
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(password: String, digest: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&password, &digest)).await {
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

    const COST: u32 = MIN_HASH_COST;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hashed = hash_password(password, COST).unwrap();

        assert!(verify_password(password, &hashed));
        assert!(!verify_password("wrong_password", &hashed));
    }

    #[test]
    fn test_salt_is_embedded() {
        let a = hash_password("pw123", COST).unwrap();
        let b = hash_password("pw123", COST).unwrap();

        assert_ne!(a, b);
        assert!(verify_password("pw123", &a));
        assert!(verify_password("pw123", &b));
    }

    #[test]
    fn test_malformed_digest_is_false() {
        assert!(!verify_password("pw123", "not-a-bcrypt-digest"));
        assert!(!verify_password("pw123", ""));
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        let err = hash_password("pw123", 2).unwrap_err();
        assert!(matches!(err, PasswordError::Hash(_)));
    }

    #[test]
    fn test_long_passwords_are_not_truncated() {
        let stored = format!("{}correct", "a".repeat(65));
        assert_eq!(stored.len(), MAX_PASSWORD_BYTES);
        let digest = hash_password(&stored, COST).unwrap();

        let longer = format!("{stored}-and-more");
        assert!(!verify_password(&longer, &digest));
        assert!(verify_password(&stored, &digest));

        assert!(matches!(
            hash_password(&longer, COST),
            Err(PasswordError::TooLong)
        ));
    }

    #[test]
    fn test_byte_limit_counts_utf8_bytes() {
        // 36 two-byte characters fill the limit exactly.
        let fits = "é".repeat(36);
        assert!(hash_password(&fits, COST).is_ok());
        assert!(matches!(
            hash_password(&format!("{fits}x"), COST),
            Err(PasswordError::TooLong)
        ));
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let digest = hash_password_blocking("pw123".into(), COST).await.unwrap();

        assert!(verify_password_blocking("pw123".into(), digest.clone()).await);
        assert!(!verify_password_blocking("pw124".into(), digest).await);
    }
}
