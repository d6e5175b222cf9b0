//! Application services used by command handlers.

pub mod mailer;
pub mod password;

use thiserror::Error;

pub use mailer::{InMemoryMailer, Mailer, SentMail, TracingMailer};
pub use password::{Argon2PasswordEncoder, PasswordEncoder, encode_blocking};

/// Errors raised by application services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Hashing or verifying a password failed.
    #[error("Password encoding failed: {0}")]
    PasswordEncoding(String),

    /// The mail could not be handed over for delivery.
    #[error("Mail delivery failed: {0}")]
    Mail(String),
}
