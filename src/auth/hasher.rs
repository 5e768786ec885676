//! Password hashing and verification using Argon2id.
//!
//! Hashes are PHC-formatted strings that carry their own salt and cost
//! parameters, so verification keeps working after the configured cost is
//! raised.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash as PhcString, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::fmt;
use thiserror::Error;

use super::types::PasswordHash;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid argon2 parameters: {0}")]
    Params(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("invalid password hash format: {0}")]
    Malformed(String),
    #[error("failed to verify password: {0}")]
    Verify(String),
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl HasherConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }

    #[must_use]
    pub const fn with_memory_kib(mut self, memory_kib: u32) -> Self {
        self.memory_kib = memory_kib;
        self
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub const fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[must_use]
    pub const fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub const fn parallelism(&self) -> u32 {
        self.parallelism
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct Hasher {
    argon2: Argon2<'static>,
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl Hasher {
    /// # Errors
    /// Returns [`HashError::Params`] if the cost parameters are out of range.
    pub fn new(config: &HasherConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| HashError::Params(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// Returns [`HashError::Hash`] if argon2 rejects the input.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, HashError> {
        let salt = SaltString::generate(&mut OsRng);

        let phc = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?;

        PasswordHash::new(phc.to_string()).map_err(|e| HashError::Hash(e.to_string()))
    }

    /// Returns `Ok(true)` only if `stored` was produced from `plaintext`.
    ///
    /// # Errors
    /// Returns [`HashError::Malformed`] if `stored` is not a PHC string.
    pub fn verify(&self, plaintext: &str, stored: &PasswordHash) -> Result<bool, HashError> {
        let parsed =
            PhcString::new(stored.as_str()).map_err(|e| HashError::Malformed(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Verify(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal cost keeps debug-build tests fast; production uses the defaults.
    fn fast_hasher() -> Result<Hasher, HashError> {
        Hasher::new(
            &HasherConfig::new()
                .with_memory_kib(1024)
                .with_iterations(1),
        )
    }

    #[test]
    fn test_hash_and_verify() -> Result<(), HashError> {
        let hasher = fast_hasher()?;
        let password = "correct-horse-battery-staple";
        let hash = hasher.hash(password)?;

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert_ne!(hash.as_str(), password);
        assert!(hasher.verify(password, &hash)?);
        assert!(!hasher.verify("wrong-password", &hash)?);
        Ok(())
    }

    #[test]
    fn test_different_salts() -> Result<(), HashError> {
        let hasher = fast_hasher()?;
        let first = hasher.hash("same-password")?;
        let second = hasher.hash("same-password")?;

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first)?);
        assert!(hasher.verify("same-password", &second)?);
        Ok(())
    }

    #[test]
    fn test_hash_carries_configured_cost() -> Result<(), HashError> {
        let hash = fast_hasher()?.hash("secret1")?;
        assert!(hash.as_str().contains("m=1024,t=1,p=1"));
        Ok(())
    }

    #[test]
    fn test_verify_after_cost_change() -> Result<(), HashError> {
        let old = fast_hasher()?.hash("secret1")?;
        let stronger = Hasher::new(
            &HasherConfig::new()
                .with_memory_kib(2048)
                .with_iterations(2),
        )?;
        assert!(stronger.verify("secret1", &old)?);
        Ok(())
    }

    #[test]
    fn test_invalid_hash_format() -> Result<(), HashError> {
        let hasher = fast_hasher()?;
        let stored = PasswordHash::new("not-a-valid-hash")
            .map_err(|e| HashError::Hash(e.to_string()))?;
        assert!(matches!(
            hasher.verify("password", &stored),
            Err(HashError::Malformed(_))
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_params() {
        let config = HasherConfig::new().with_memory_kib(1).with_parallelism(4);
        assert!(matches!(Hasher::new(&config), Err(HashError::Params(_))));
    }

    #[test]
    fn test_defaults_follow_argon2() {
        let config = HasherConfig::default();
        assert_eq!(config.memory_kib(), 19_456);
        assert_eq!(config.iterations(), 2);
        assert_eq!(config.parallelism(), 1);
    }
}
