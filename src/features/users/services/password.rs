//! Pluggable credential hashing.
//!
//! Argon2 with a random salt, producing a PHC string for storage.
//! Hashing and verification run on the blocking pool because Argon2 is
//! CPU-intensive and would stall the async runtime if run inline.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::task;

use crate::core::error::{AppError, Result};

pub async fn hash_password(password: String) -> Result<String> {
    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password hashing task panicked: {}", e)))?
}

pub async fn verify_password(password: String, stored_hash: String) -> Result<bool> {
    task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&stored_hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify_round_trip() {
        let hash = hash_password("correct horse battery".to_string())
            .await
            .unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(
            verify_password("correct horse battery".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(!verify_password("wrong password".to_string(), hash)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let a = hash_password("same input".to_string()).await.unwrap();
        let b = hash_password("same input".to_string()).await.unwrap();

        assert_ne!(a, b);
    }
}
