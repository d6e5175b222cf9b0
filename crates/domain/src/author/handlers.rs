use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use events::EventRecorder;

use super::{AuthorError, AuthorFactory, AuthorRepository, CreateAuthor, DeleteAuthor, UpdateAuthor};
use crate::command::CommandHandler;
use crate::error::{DomainError, RepositoryError};

pub struct CreateAuthorHandler {
    authors: Arc<dyn AuthorRepository>,
    factory: AuthorFactory,
}

impl CreateAuthorHandler {
    pub fn new(authors: Arc<dyn AuthorRepository>) -> Self {
        Self {
            authors,
            factory: AuthorFactory,
        }
    }
}

#[async_trait]
impl CommandHandler<CreateAuthor> for CreateAuthorHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: CreateAuthor,
        _events: &EventRecorder,
    ) -> Result<EntityId, DomainError> {
        let author = self.factory.create(&command.name)?;
        let author = self.authors.save(author).await?;
        let id = author.id().ok_or(RepositoryError::NotPersisted("Author"))?;

        tracing::info!(author_id = %id, "author created");
        Ok(id)
    }
}

pub struct UpdateAuthorHandler {
    authors: Arc<dyn AuthorRepository>,
}

impl UpdateAuthorHandler {
    pub fn new(authors: Arc<dyn AuthorRepository>) -> Self {
        Self { authors }
    }
}

#[async_trait]
impl CommandHandler<UpdateAuthor> for UpdateAuthorHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(&self, command: UpdateAuthor, _events: &EventRecorder) -> Result<(), DomainError> {
        let mut author = self
            .authors
            .get(command.id)
            .await?
            .ok_or(AuthorError::NotFound(command.id))?;

        author.rename(command.name)?;
        self.authors.save(author).await?;
        Ok(())
    }
}

pub struct DeleteAuthorHandler {
    authors: Arc<dyn AuthorRepository>,
}

impl DeleteAuthorHandler {
    pub fn new(authors: Arc<dyn AuthorRepository>) -> Self {
        Self { authors }
    }
}

#[async_trait]
impl CommandHandler<DeleteAuthor> for DeleteAuthorHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(&self, command: DeleteAuthor, _events: &EventRecorder) -> Result<(), DomainError> {
        let author = self
            .authors
            .get(command.id)
            .await?
            .ok_or(AuthorError::NotFound(command.id))?;

        self.authors.delete(&author).await?;
        tracing::info!(author_id = %command.id, "author deleted");
        Ok(())
    }
}
