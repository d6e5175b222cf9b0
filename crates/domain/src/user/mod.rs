//! Users of the catalog back office.

mod commands;
mod event;
mod factory;
mod handlers;
mod repository;
mod subscriber;
pub mod validator;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use common::EntityId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::exceeds;

pub use commands::{CreateUser, DeleteUser, SendUserWelcomeEmail, UpdateUser};
pub use event::UserRegistered;
pub use factory::UserFactory;
pub use handlers::{
    CreateUserHandler, DeleteUserHandler, SendUserWelcomeEmailHandler, UpdateUserHandler,
};
pub use repository::UserRepository;
pub use subscriber::WelcomeEmailSubscriber;

pub const NAME_MAX_LEN: usize = 255;
pub const AVATAR_MAX_LEN: usize = 500;

/// Errors raised by user operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("{0}")]
    InvalidEmail(&'static str),

    #[error("{0}")]
    InvalidPassword(&'static str),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("A user with this email already exists")]
    EmailAlreadyExists,

    #[error("User {field} cannot be longer than {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("User {0} not found")]
    NotFound(EntityId),
}

/// Access role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Role::User),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(UserError::InvalidRole(other.to_string())),
        }
    }
}

/// The editable part of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub roles: Vec<Role>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl UserProfile {
    fn validate(&self) -> Result<(), UserError> {
        validator::validate_email(&self.email)?;
        if self.name.as_deref().is_some_and(|n| exceeds(n, NAME_MAX_LEN)) {
            return Err(UserError::FieldTooLong {
                field: "name",
                max: NAME_MAX_LEN,
            });
        }
        if self
            .avatar
            .as_deref()
            .is_some_and(|a| exceeds(a, AVATAR_MAX_LEN))
        {
            return Err(UserError::FieldTooLong {
                field: "avatar",
                max: AVATAR_MAX_LEN,
            });
        }
        Ok(())
    }
}

/// A back-office user. Only the password hash is ever held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Option<EntityId>,
    profile: UserProfile,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user. Duplicate roles are dropped.
    pub fn new(mut profile: UserProfile, password_hash: String) -> Result<Self, UserError> {
        profile.validate()?;
        dedup_roles(&mut profile.roles);
        let now = Utc::now();
        Ok(Self {
            id: None,
            profile,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn restore(
        id: EntityId,
        profile: UserProfile,
        password_hash: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            profile,
            password_hash,
            created_at,
            updated_at,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn name(&self) -> Option<&str> {
        self.profile.name.as_deref()
    }

    pub fn avatar(&self) -> Option<&str> {
        self.profile.avatar.as_deref()
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Effective roles: the stored ones plus [`Role::User`], each once.
    pub fn roles(&self) -> Vec<Role> {
        let mut roles = self.profile.roles.clone();
        roles.push(Role::User);
        dedup_roles(&mut roles);
        roles
    }

    /// Roles as granted, without the implicit [`Role::User`].
    pub fn stored_roles(&self) -> &[Role] {
        &self.profile.roles
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Name used when addressing the user, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(self.email())
    }

    /// Replaces email, roles, name and avatar.
    pub fn update_profile(&mut self, mut profile: UserProfile) -> Result<(), UserError> {
        profile.validate()?;
        dedup_roles(&mut profile.roles);
        self.profile = profile;
        self.touch();
        Ok(())
    }

    pub fn change_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

// Keeps first occurrences in order.
fn dedup_roles(roles: &mut Vec<Role>) {
    let mut seen = Vec::with_capacity(roles.len());
    roles.retain(|role| {
        if seen.contains(role) {
            false
        } else {
            seen.push(*role);
            true
        }
    });
}
