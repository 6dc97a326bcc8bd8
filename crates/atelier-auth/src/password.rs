//! Password hashing
//!
//! Argon2id with parameters embedded in the encoded digest, so
//! verification never depends on separately-stored configuration.
//! Hashing is the one deliberately expensive operation in this crate;
//! it blocks proportionally to its memory cost.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};
use zeroize::Zeroizing;

use crate::config::PasswordConfig;
use crate::error::{AuthError, AuthResult};

/// Argon2id hash/verify wrapper
#[derive(Clone)]
pub struct PasswordService {
    config: PasswordConfig,
}

impl PasswordService {
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Hash a password using Argon2id.
    ///
    /// Succeeds for any well-formed UTF-8 input up to the configured
    /// length cap. The plaintext is never logged.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        if password.len() > self.config.max_password_length {
            return Err(AuthError::WeakPassword(format!(
                "password must be at most {} bytes",
                self.config.max_password_length
            )));
        }

        let plaintext = Zeroizing::new(password.to_string());
        let salt = SaltString::generate(&mut OsRng);

        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.hash_length),
        )
        .map_err(|e| AuthError::Internal(format!("invalid Argon2 params: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let digest = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))?;

        Ok(digest.to_string())
    }

    /// Verify a password against a stored digest.
    ///
    /// Returns `false`, never an error, for a mismatched password,
    /// a malformed digest, or an algorithm mismatch. Salt and
    /// parameters come from the digest itself.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let plaintext = Zeroizing::new(password.to_string());

        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
