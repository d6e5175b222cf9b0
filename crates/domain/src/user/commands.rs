use std::fmt;

use common::EntityId;

use crate::command::Command;

/// Registers a user. Without a password a six-digit one is generated and
/// sent in the welcome mail.
#[derive(Clone, Default)]
pub struct CreateUser {
    pub email: String,
    pub roles: Vec<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

impl Command for CreateUser {
    const NAME: &'static str = "CreateUser";
    type Output = EntityId;
}

/// Replaces a user's email, roles, name and avatar, and the password when
/// one is given.
#[derive(Clone)]
pub struct UpdateUser {
    pub id: EntityId,
    pub email: String,
    pub roles: Vec<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl Command for UpdateUser {
    const NAME: &'static str = "UpdateUser";
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct DeleteUser {
    pub id: EntityId,
}

impl Command for DeleteUser {
    const NAME: &'static str = "DeleteUser";
    type Output = ();
}

/// Mails a freshly registered user their credentials.
#[derive(Clone)]
pub struct SendUserWelcomeEmail {
    pub name: String,
    pub email: String,
    pub plain_password: String,
}

impl Command for SendUserWelcomeEmail {
    const NAME: &'static str = "SendUserWelcomeEmail";
    type Output = ();
}

fn redact(password: &Option<String>) -> Option<&'static str> {
    password.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("email", &self.email)
            .field("roles", &self.roles)
            .field("name", &self.name)
            .field("avatar", &self.avatar)
            .field("password", &redact(&self.password))
            .finish()
    }
}

impl fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .field("password", &redact(&self.password))
            .field("name", &self.name)
            .field("avatar", &self.avatar)
            .finish()
    }
}

impl fmt::Debug for SendUserWelcomeEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendUserWelcomeEmail")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
