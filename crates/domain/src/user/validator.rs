//! Input rules for user emails, passwords and roles.

use std::sync::LazyLock;

use regex::Regex;

use super::{Role, UserError};

pub const EMAIL_MAX_LEN: usize = 180;
pub const PASSWORD_MIN_LEN: usize = 8;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

/// Checks that an email is present, short enough and well formed.
pub fn validate_email(email: &str) -> Result<(), UserError> {
    if matches!(email.trim(), "" | "0") {
        return Err(UserError::InvalidEmail("Email is required"));
    }
    if email.len() > EMAIL_MAX_LEN {
        return Err(UserError::InvalidEmail(
            "Email cannot be longer than 180 characters",
        ));
    }
    let local = email.split('@').next().unwrap_or_default();
    if !EMAIL.is_match(email) || local.starts_with('.') || local.ends_with('.') || local.contains("..")
    {
        return Err(UserError::InvalidEmail("Please provide a valid email address"));
    }
    Ok(())
}

/// Checks a password chosen by a person against the password policy.
pub fn validate_password(password: &str) -> Result<(), UserError> {
    if matches!(password, "" | "0") {
        return Err(UserError::InvalidPassword("Password is required"));
    }
    if password.len() < PASSWORD_MIN_LEN {
        return Err(UserError::InvalidPassword(
            "Password must be at least 8 characters long",
        ));
    }
    let lower = password.bytes().any(|b| b.is_ascii_lowercase());
    let upper = password.bytes().any(|b| b.is_ascii_uppercase());
    let digit = password.bytes().any(|b| b.is_ascii_digit());
    if !(lower && upper && digit) {
        return Err(UserError::InvalidPassword(
            "Password must contain at least one lowercase letter, one uppercase letter, and one number",
        ));
    }
    Ok(())
}

/// Parses role names, failing on the first unknown one.
pub fn parse_roles<S: AsRef<str>>(roles: &[S]) -> Result<Vec<Role>, UserError> {
    roles.iter().map(|role| role.as_ref().parse()).collect()
}
