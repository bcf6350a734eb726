use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
};
use rand_core::OsRng;

use crate::errors::GraphError;

/// Salted password hashing collaborator used by the identity store.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, GraphError>;

    /// `Ok(true)` if the password matches, `Ok(false)` if it doesn't, or an
    /// error if the stored hash cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, GraphError>;
}

/// Argon2id hasher. Verification goes through `PasswordVerifier`, which compares
/// digests in constant time.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hasher with explicit memory (KiB) and iteration costs. Hashes record
    /// their own parameters, so verification works across cost changes.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, GraphError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| GraphError::Hashing { message: e.to_string() })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, GraphError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| GraphError::Hashing { message: e.to_string() })
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, GraphError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| GraphError::Hashing { message: e.to_string() })?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
