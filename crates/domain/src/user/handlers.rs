use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use events::EventRecorder;
use rand::Rng;

use super::validator::{parse_roles, validate_email, validate_password};
use super::{
    CreateUser, DeleteUser, SendUserWelcomeEmail, UpdateUser, UserError, UserFactory, UserProfile,
    UserRegistered, UserRepository,
};
use crate::command::CommandHandler;
use crate::error::{DomainError, RepositoryError};
use crate::services::{Mailer, PasswordEncoder, encode_blocking};

/// Subject line of the mail sent to new users.
pub const WELCOME_SUBJECT: &str = "Welcome to the system!";

const GENERATED_PASSWORD_LEN: usize = 6;

// Six digits from 1 to 9.
fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(1..=9u8)))
        .collect()
}

// A concurrent insert of the same email surfaces as a unique violation.
fn email_conflict(err: RepositoryError) -> DomainError {
    match err {
        RepositoryError::UniqueViolation(_) => UserError::EmailAlreadyExists.into(),
        other => other.into(),
    }
}

pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
    factory: UserFactory,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            users,
            factory: UserFactory::new(encoder),
        }
    }
}

#[async_trait]
impl CommandHandler<CreateUser> for CreateUserHandler {
    #[tracing::instrument(skip(self, command, events), fields(email = %command.email))]
    async fn handle(
        &self,
        command: CreateUser,
        events: &EventRecorder,
    ) -> Result<EntityId, DomainError> {
        validate_email(&command.email)?;
        let roles = parse_roles(&command.roles)?;
        let plain_password = match command.password {
            Some(password) => {
                validate_password(&password)?;
                password
            }
            None => generate_password(),
        };

        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists.into());
        }

        let profile = UserProfile {
            email: command.email,
            roles,
            name: command.name,
            avatar: command.avatar,
        };
        let user = self
            .factory
            .create_with_plain_password(profile, &plain_password)
            .await?;
        let user = self.users.save(user).await.map_err(email_conflict)?;
        let id = user.id().ok_or(RepositoryError::NotPersisted("User"))?;

        events.record(&UserRegistered {
            name: user.display_name().to_string(),
            email: user.email().to_string(),
            plain_password,
        })?;

        tracing::info!(user_id = %id, "user created");
        Ok(id)
    }
}

pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { users, encoder }
    }
}

#[async_trait]
impl CommandHandler<UpdateUser> for UpdateUserHandler {
    #[tracing::instrument(skip(self, command, _events), fields(user_id = %command.id))]
    async fn handle(&self, command: UpdateUser, _events: &EventRecorder) -> Result<(), DomainError> {
        let mut user = self
            .users
            .get(command.id)
            .await?
            .ok_or(UserError::NotFound(command.id))?;

        if user.email() != command.email {
            if let Some(existing) = self.users.find_by_email(&command.email).await? {
                if existing.id() != Some(command.id) {
                    return Err(UserError::EmailAlreadyExists.into());
                }
            }
        }

        let roles = parse_roles(&command.roles)?;
        if let Some(password) = &command.password {
            validate_password(password)?;
        }

        user.update_profile(UserProfile {
            email: command.email,
            roles,
            name: command.name,
            avatar: command.avatar,
        })?;
        if let Some(password) = command.password {
            user.change_password_hash(encode_blocking(self.encoder.clone(), password).await?);
        }

        self.users.save(user).await.map_err(email_conflict)?;
        Ok(())
    }
}

pub struct DeleteUserHandler {
    users: Arc<dyn UserRepository>,
}

impl DeleteUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CommandHandler<DeleteUser> for DeleteUserHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(&self, command: DeleteUser, _events: &EventRecorder) -> Result<(), DomainError> {
        let user = self
            .users
            .get(command.id)
            .await?
            .ok_or(UserError::NotFound(command.id))?;

        self.users.delete(&user).await?;
        tracing::info!(user_id = %command.id, "user deleted");
        Ok(())
    }
}

pub struct SendUserWelcomeEmailHandler {
    mailer: Arc<dyn Mailer>,
}

impl SendUserWelcomeEmailHandler {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl CommandHandler<SendUserWelcomeEmail> for SendUserWelcomeEmailHandler {
    #[tracing::instrument(skip(self, command, _events), fields(email = %command.email))]
    async fn handle(
        &self,
        command: SendUserWelcomeEmail,
        _events: &EventRecorder,
    ) -> Result<(), DomainError> {
        let body = format!(
            "Hello {},\n\nYour account has been created.\nYour password is: {}\n",
            command.name, command.plain_password
        );
        self.mailer
            .send(&command.email, WELCOME_SUBJECT, &body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_is_six_non_zero_digits() {
        for _ in 0..50 {
            let password = generate_password();
            assert_eq!(password.len(), 6);
            assert!(password.chars().all(|c| ('1'..='9').contains(&c)));
        }
    }
}
