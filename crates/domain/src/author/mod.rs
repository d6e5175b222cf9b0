//! Authors of catalog books.

mod commands;
mod factory;
mod handlers;
mod repository;

use common::EntityId;
use serde::Serialize;
use thiserror::Error;

use crate::text::{exceeds, is_blank};

pub use commands::{CreateAuthor, DeleteAuthor, UpdateAuthor};
pub use factory::AuthorFactory;
pub use handlers::{CreateAuthorHandler, DeleteAuthorHandler, UpdateAuthorHandler};
pub use repository::AuthorRepository;

/// Longest accepted author name, in characters.
pub const NAME_MAX_LEN: usize = 40;

/// Errors raised by author operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorError {
    #[error("Author name is required")]
    NameRequired,

    #[error("Author name cannot be longer than {max} characters")]
    NameTooLong { max: usize },

    #[error("Author {0} not found")]
    NotFound(EntityId),
}

/// A book author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    id: Option<EntityId>,
    name: String,
}

impl Author {
    /// Creates a new, not yet persisted author.
    pub fn new(name: impl Into<String>) -> Result<Self, AuthorError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self { id: None, name })
    }

    /// Rebuilds an author loaded from storage.
    pub fn restore(id: EntityId, name: String) -> Self {
        Self { id: Some(id), name }
    }

    /// Returns the author with the id assigned by storage.
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), AuthorError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), AuthorError> {
    if is_blank(name) {
        return Err(AuthorError::NameRequired);
    }
    if exceeds(name, NAME_MAX_LEN) {
        return Err(AuthorError::NameTooLong { max: NAME_MAX_LEN });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_author_has_no_id() {
        let author = Author::new("Ursula K. Le Guin").unwrap();
        assert_eq!(author.id(), None);
        assert_eq!(author.name(), "Ursula K. Le Guin");
    }

    #[test]
    fn blank_name_is_required() {
        assert_eq!(Author::new("   "), Err(AuthorError::NameRequired));
    }

    #[test]
    fn name_longer_than_limit_is_rejected() {
        let name = "x".repeat(NAME_MAX_LEN + 1);
        assert_eq!(
            Author::new(name),
            Err(AuthorError::NameTooLong { max: NAME_MAX_LEN })
        );
        assert!(Author::new("x".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn rename_keeps_old_name_on_error() {
        let mut author = Author::restore(EntityId::new(1), "Homer".to_string());
        assert!(author.rename("").is_err());
        assert_eq!(author.name(), "Homer");

        author.rename("Virgil").unwrap();
        assert_eq!(author.name(), "Virgil");
    }
}
