// src/utils/hash.rs

use argon2::{
    Argon2,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::error::AppError;

/// Hashes a password with Argon2id and a fresh random salt.
/// Returns the PHC string stored in the users table.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalServerError(format!("password hashing failed: {}", e)))
}

/// Checks a candidate password against a stored PHC hash.
///
/// `Ok(false)` means the password does not match. A stored hash that cannot
/// be parsed is corrupt data and reported as an internal error instead of a
/// plain mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| {
        AppError::InternalServerError(format!("stored password hash is invalid: {}", e))
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(AppError::InternalServerError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("Str0ng!pass").unwrap();

        assert_ne!(hash, "Str0ng!pass");
        assert!(verify_password("Str0ng!pass", &hash).unwrap());
        assert!(!verify_password("Wr0ng!pass!", &hash).unwrap());
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let first = hash_password("Str0ng!pass").unwrap();
        let second = hash_password("Str0ng!pass").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
