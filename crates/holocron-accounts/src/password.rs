//! Password hashing and verification.
//!
//! Argon2id with the crate's default parameters, salted per hash. The
//! output is a self-describing PHC string, so parameters can change later
//! without invalidating stored hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::AccountError;

/// Hashes a password with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::PasswordHash(e.to_string()))
}

/// Verifies a password against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AccountError> {
    let parsed =
        PasswordHash::new(stored).map_err(|e| AccountError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
