//! Domain error types.

use common::EntityId;
use events::EventError;
use thiserror::Error;

use crate::author::AuthorError;
use crate::book::BookError;
use crate::category::CategoryError;
use crate::services::ServiceError;
use crate::subject::SubjectError;
use crate::user::UserError;

/// Errors raised by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store failed.
    #[error("Storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored row could not be turned back into an entity.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The row to update was removed in the meantime.
    #[error("{entity} {id} no longer exists")]
    Gone { entity: &'static str, id: EntityId },

    /// An entity that was never saved was passed where a stored one is needed.
    #[error("{0} has not been persisted")]
    NotPersisted(&'static str),
}

/// Errors that can occur while dispatching and handling commands.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Author error: {0}")]
    Author(#[from] AuthorError),

    #[error("Book error: {0}")]
    Book(#[from] BookError),

    #[error("Category error: {0}")]
    Category(#[from] CategoryError),

    #[error("Subject error: {0}")]
    Subject(#[from] SubjectError),

    #[error("User error: {0}")]
    User(#[from] UserError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// No handler is registered for the dispatched command.
    #[error("No handler registered for command {0}")]
    MissingHandler(&'static str),

    /// An envelope reached a handler for a different command type.
    #[error("Handler for {expected} received {found}")]
    UnexpectedMessage {
        expected: &'static str,
        found: &'static str,
    },

    /// A handler produced an output of the wrong type.
    #[error("Handler for {0} returned an unexpected output type")]
    UnexpectedOutput(&'static str),
}
