//! PBKDF2 password hashing.
//!
//! Hashing is CPU bound, so request handlers go through the `*_blocking`
//! wrappers that run it on tokio's blocking pool.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use rand_core::OsRng;

use crate::errors::AppError;

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str, rounds: u32) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params {
        rounds,
        output_length: 32,
    };
    let hash = Pbkdf2.hash_password_customized(password.as_bytes(), None, None, params, &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(hash) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is malformed");
        return false;
    };
    Pbkdf2.verify_password(password.as_bytes(), &hash).is_ok()
}

/// Hash a password on the blocking thread pool.
pub async fn hash_password_blocking(password: String, rounds: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password, rounds)).await?
}

/// Verify a password on the blocking thread pool.
pub async fn verify_password_blocking(
    password: String,
    stored_hash: String,
) -> Result<bool, AppError> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse", 1_000).unwrap();
        assert!(hash.starts_with("$pbkdf2-sha256$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same", 1_000).unwrap();
        let b = hash_password("same", 1_000).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_rejects() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_blocking_pool_round_trip() {
        let hash = hash_password_blocking("correct horse".to_string(), 1_000)
            .await
            .unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(
            verify_password_blocking("correct horse".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(!verify_password_blocking("battery staple".to_string(), hash)
            .await
            .unwrap());
    }
}
