//! Password hashing and verification with argon2id.
//!
//! Hashes are PHC strings that carry the algorithm, cost parameters and salt,
//! so verification needs nothing but the stored string.

use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use super::errors::AuthError;
use crate::config::HashCost;

/// Hashes and verifies user passwords. Never sees tokens.
#[derive(Clone)]
pub struct CredentialManager {
    params: Params,
}

impl CredentialManager {
    pub fn new(cost: HashCost) -> Result<Self, AuthError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AuthError::Hashing(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plain password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The cost parameters embedded in `hash` win over the configured ones, so
    /// hashes created under an older configuration keep verifying. A malformed
    /// hash is a mismatch.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
