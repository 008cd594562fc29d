//! Password hashing

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password does not match")]
    Mismatch,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Hash `plain` with a fresh random salt, returning a PHC string
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check `plain` against a stored PHC string
pub fn verify_password(plain: &str, stored: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|e| PasswordError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .map_err(|e| match e {
            argon2::password_hash::Error::Password => PasswordError::Mismatch,
            other => PasswordError::Hash(other.to_string()),
        })
}
