use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use events::EventRecorder;

use super::{BookError, BookFactory, BookRepository, CreateBook, DeleteBook, UpdateBook};
use crate::author::{Author, AuthorRepository};
use crate::command::CommandHandler;
use crate::error::{DomainError, RepositoryError};
use crate::subject::{Subject, SubjectRepository};

/// Looks up the relations named by a book command.
#[derive(Clone)]
struct Relations {
    authors: Arc<dyn AuthorRepository>,
    subjects: Arc<dyn SubjectRepository>,
}

impl Relations {
    async fn resolve(
        &self,
        author_ids: &[EntityId],
        subject_ids: &[EntityId],
    ) -> Result<(Vec<Subject>, Vec<Author>), RepositoryError> {
        let authors = self.authors.get_by_ids(author_ids).await?;
        let subjects = self.subjects.get_by_ids(subject_ids).await?;

        if authors.len() < author_ids.len() || subjects.len() < subject_ids.len() {
            tracing::debug!(
                requested_authors = author_ids.len(),
                found_authors = authors.len(),
                requested_subjects = subject_ids.len(),
                found_subjects = subjects.len(),
                "unknown relation ids skipped"
            );
        }
        Ok((subjects, authors))
    }
}

pub struct CreateBookHandler {
    books: Arc<dyn BookRepository>,
    relations: Relations,
    factory: BookFactory,
}

impl CreateBookHandler {
    pub fn new(
        books: Arc<dyn BookRepository>,
        authors: Arc<dyn AuthorRepository>,
        subjects: Arc<dyn SubjectRepository>,
    ) -> Self {
        Self {
            books,
            relations: Relations { authors, subjects },
            factory: BookFactory,
        }
    }
}

#[async_trait]
impl CommandHandler<CreateBook> for CreateBookHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: CreateBook,
        _events: &EventRecorder,
    ) -> Result<EntityId, DomainError> {
        let (subjects, authors) = self
            .relations
            .resolve(&command.author_ids, &command.subject_ids)
            .await?;

        let book = self.factory.create(command.details, subjects, authors)?;
        let book = self.books.save(book).await?;
        let id = book.id().ok_or(RepositoryError::NotPersisted("Book"))?;

        tracing::info!(book_id = %id, "book created");
        Ok(id)
    }
}

pub struct UpdateBookHandler {
    books: Arc<dyn BookRepository>,
    relations: Relations,
}

impl UpdateBookHandler {
    pub fn new(
        books: Arc<dyn BookRepository>,
        authors: Arc<dyn AuthorRepository>,
        subjects: Arc<dyn SubjectRepository>,
    ) -> Self {
        Self {
            books,
            relations: Relations { authors, subjects },
        }
    }
}

#[async_trait]
impl CommandHandler<UpdateBook> for UpdateBookHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(&self, command: UpdateBook, _events: &EventRecorder) -> Result<(), DomainError> {
        let mut book = self
            .books
            .get(command.id)
            .await?
            .ok_or(BookError::NotFound(command.id))?;

        let (subjects, authors) = self
            .relations
            .resolve(&command.author_ids, &command.subject_ids)
            .await?;

        book.update(command.details, subjects, authors)?;
        self.books.save(book).await?;
        Ok(())
    }
}

pub struct DeleteBookHandler {
    books: Arc<dyn BookRepository>,
}

impl DeleteBookHandler {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl CommandHandler<DeleteBook> for DeleteBookHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(&self, command: DeleteBook, _events: &EventRecorder) -> Result<(), DomainError> {
        let book = self
            .books
            .get(command.id)
            .await?
            .ok_or(BookError::NotFound(command.id))?;

        self.books.delete(&book).await?;
        tracing::info!(book_id = %command.id, "book deleted");
        Ok(())
    }
}
