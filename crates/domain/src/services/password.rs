//! Password hashing.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use super::ServiceError;

/// Turns plain passwords into storable hashes.
pub trait PasswordEncoder: Send + Sync {
    /// Hashes a plain password with a fresh salt.
    fn encode(&self, plain: &str) -> Result<String, ServiceError>;

    /// Checks a plain password against a stored hash.
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, ServiceError>;
}

/// Hashes `plain` on tokio's blocking pool, keeping the CPU-bound work off
/// the async workers.
pub async fn encode_blocking(
    encoder: Arc<dyn PasswordEncoder>,
    plain: String,
) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || encoder.encode(&plain))
        .await
        .map_err(|e| ServiceError::PasswordEncoding(e.to_string()))?
}

/// Argon2id encoder producing PHC strings.
#[derive(Clone, Default)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an encoder with explicit cost parameters (memory in KiB,
    /// iterations, parallelism).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, ServiceError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| ServiceError::PasswordEncoding(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl std::fmt::Debug for Argon2PasswordEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2PasswordEncoder").finish_non_exhaustive()
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, plain: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::PasswordEncoding(e.to_string()))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, ServiceError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| ServiceError::PasswordEncoding(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> Argon2PasswordEncoder {
        // Cheap parameters keep the tests fast.
        Argon2PasswordEncoder::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn encoded_password_verifies() {
        let encoder = encoder();
        let hash = encoder.encode("Secret123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "Secret123");
        assert!(encoder.verify("Secret123", &hash).unwrap());
        assert!(!encoder.verify("secret123", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let encoder = encoder();
        let a = encoder.encode("Secret123").unwrap();
        let b = encoder.encode("Secret123").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn encode_blocking_hashes_off_the_runtime() {
        let encoder: Arc<dyn PasswordEncoder> = Arc::new(encoder());
        let hash = encode_blocking(encoder.clone(), "Secret123".to_string())
            .await
            .unwrap();

        assert!(encoder.verify("Secret123", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let result = encoder().verify("Secret123", "not-a-hash");
        assert!(matches!(result, Err(ServiceError::PasswordEncoding(_))));
    }
}
