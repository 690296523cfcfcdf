// Password hashing and verification service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::error::AuthError;

/// Password service for hashing and verification
///
/// Argon2id with a random salt per hash; digests are PHC strings so the
/// parameters travel with the hash.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHashError)
    }

    /// Verify a password against a hash
    ///
    /// A mismatch is `Ok(false)`; only an unparseable digest is an error.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Hash on the blocking pool so the runtime is not stalled
    pub async fn hash_password_async(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {}", e)))?
    }

    /// Verify on the blocking pool so the runtime is not stalled
    pub async fn verify_password_async(password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_password("i-am-batman").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordService::verify_password("i-am-batman", &hash).unwrap());
        assert!(!PasswordService::verify_password("i-am-robin", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let first = PasswordService::hash_password("same").unwrap();
        let second = PasswordService::hash_password("same").unwrap();

        assert_ne!(first, second);
        assert!(PasswordService::verify_password("same", &first).unwrap());
        assert!(PasswordService::verify_password("same", &second).unwrap());
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = PasswordService::hash_password("plaintext-secret").unwrap();
        assert!(!hash.contains("plaintext-secret"));
    }

    #[test]
    fn test_garbage_digest_is_an_error() {
        let result = PasswordService::verify_password("whatever", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::PasswordHashError)));
    }

    #[tokio::test]
    async fn test_async_hash_and_verify() {
        let hash = PasswordService::hash_password_async("oracle".to_string())
            .await
            .unwrap();

        assert!(PasswordService::verify_password_async("oracle".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!PasswordService::verify_password_async("joker".to_string(), hash)
            .await
            .unwrap());
    }
}
