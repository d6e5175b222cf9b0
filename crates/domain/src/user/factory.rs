use std::sync::Arc;

use super::{User, UserProfile};
use crate::error::DomainError;
use crate::services::{PasswordEncoder, encode_blocking};

/// Builds new users, hashing their password on the way.
#[derive(Clone)]
pub struct UserFactory {
    encoder: Arc<dyn PasswordEncoder>,
}

impl UserFactory {
    pub fn new(encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { encoder }
    }

    /// Builds a user from an already hashed password.
    pub fn create(&self, profile: UserProfile, password_hash: String) -> Result<User, DomainError> {
        Ok(User::new(profile, password_hash)?)
    }

    pub async fn create_with_plain_password(
        &self,
        profile: UserProfile,
        plain_password: &str,
    ) -> Result<User, DomainError> {
        let hash = encode_blocking(self.encoder.clone(), plain_password.to_string()).await?;
        self.create(profile, hash)
    }
}
