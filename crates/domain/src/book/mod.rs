//! Books and their author and subject relations.

mod commands;
mod factory;
mod handlers;
mod repository;

use common::EntityId;
use serde::Serialize;
use thiserror::Error;

use crate::author::Author;
use crate::subject::Subject;
use crate::text::{exceeds, is_blank};

pub use commands::{CreateBook, DeleteBook, UpdateBook};
pub use factory::BookFactory;
pub use handlers::{CreateBookHandler, DeleteBookHandler, UpdateBookHandler};
pub use repository::BookRepository;

pub const TITLE_MAX_LEN: usize = 40;
pub const PUBLISHER_MAX_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("Book title is required")]
    TitleRequired,

    #[error("Book {field} cannot be longer than {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Publish year must be a four-digit year, got `{0}`")]
    InvalidPublishYear(String),

    #[error("Edition must be at least 1, got {0}")]
    InvalidEdition(i32),

    #[error("Price cannot be negative, got {0}")]
    InvalidPrice(i64),

    #[error("Book {0} not found")]
    NotFound(EntityId),
}

/// The scalar fields of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub title: String,
    pub edition: i32,
    /// Four ASCII digits, e.g. `"1969"`.
    pub publish_year: String,
    /// Price in minor currency units.
    pub price: i64,
    pub publisher: String,
}

impl BookDetails {
    fn validate(&self) -> Result<(), BookError> {
        if is_blank(&self.title) {
            return Err(BookError::TitleRequired);
        }
        if exceeds(&self.title, TITLE_MAX_LEN) {
            return Err(BookError::FieldTooLong {
                field: "title",
                max: TITLE_MAX_LEN,
            });
        }
        if exceeds(&self.publisher, PUBLISHER_MAX_LEN) {
            return Err(BookError::FieldTooLong {
                field: "publisher",
                max: PUBLISHER_MAX_LEN,
            });
        }
        if self.publish_year.len() != 4 || !self.publish_year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BookError::InvalidPublishYear(self.publish_year.clone()));
        }
        if self.edition < 1 {
            return Err(BookError::InvalidEdition(self.edition));
        }
        if self.price < 0 {
            return Err(BookError::InvalidPrice(self.price));
        }
        Ok(())
    }
}

/// A catalog book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    id: Option<EntityId>,
    #[serde(flatten)]
    details: BookDetails,
    subjects: Vec<Subject>,
    authors: Vec<Author>,
}

impl Book {
    pub fn new(
        details: BookDetails,
        subjects: Vec<Subject>,
        authors: Vec<Author>,
    ) -> Result<Self, BookError> {
        details.validate()?;
        Ok(Self {
            id: None,
            details,
            subjects,
            authors,
        })
    }

    pub fn restore(
        id: EntityId,
        details: BookDetails,
        subjects: Vec<Subject>,
        authors: Vec<Author>,
    ) -> Self {
        Self {
            id: Some(id),
            details,
            subjects,
            authors,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Replaces every field and both relations.
    pub fn update(
        &mut self,
        details: BookDetails,
        subjects: Vec<Subject>,
        authors: Vec<Author>,
    ) -> Result<(), BookError> {
        details.validate()?;
        self.details = details;
        self.subjects = subjects;
        self.authors = authors;
        Ok(())
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn details(&self) -> &BookDetails {
        &self.details
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// Ids of the related subjects, skipping any that were never saved.
    pub fn subject_ids(&self) -> Vec<EntityId> {
        self.subjects.iter().filter_map(Subject::id).collect()
    }

    /// Ids of the related authors, skipping any that were never saved.
    pub fn author_ids(&self) -> Vec<EntityId> {
        self.authors.iter().filter_map(Author::id).collect()
    }
}
