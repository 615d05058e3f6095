//! Credential hashing boundary.
//!
//! Only this module sees a clear-text password. Everything else handles the
//! PHC string it produces.

use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential hashing failed: {0}")]
    Hash(String),

    #[error("stored credential is not a valid PHC string: {0}")]
    Malformed(String),
}

/// Turns a password into a storable hash and checks candidates against it.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// PBKDF2-HMAC-SHA256 producing `$pbkdf2-sha256$...` PHC strings.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2Hasher {
    rounds: u32,
}

impl Pbkdf2Hasher {
    pub const DEFAULT_ROUNDS: u32 = 100_000;
    const OUTPUT_LENGTH: usize = 32;

    pub fn with_rounds(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self::with_rounds(Self::DEFAULT_ROUNDS)
    }
}

impl CredentialHasher for Pbkdf2Hasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        let params = Params {
            rounds: self.rounds,
            output_length: Self::OUTPUT_LENGTH,
        };

        Pbkdf2
            .hash_password_customized(password.as_bytes(), None, None, params, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash).map_err(|e| CredentialError::Malformed(e.to_string()))?;
        Ok(Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok())
    }
}
