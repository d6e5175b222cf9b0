use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use events::EventRecorder;

use super::{
    CategoryError, CategoryFactory, CategoryRepository, CreateCategory, DeleteCategory,
    UpdateCategory,
};
use crate::command::CommandHandler;
use crate::error::{DomainError, RepositoryError};

pub struct CreateCategoryHandler {
    categories: Arc<dyn CategoryRepository>,
    factory: CategoryFactory,
}

impl CreateCategoryHandler {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            categories,
            factory: CategoryFactory,
        }
    }
}

#[async_trait]
impl CommandHandler<CreateCategory> for CreateCategoryHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: CreateCategory,
        _events: &EventRecorder,
    ) -> Result<EntityId, DomainError> {
        let category = self.factory.create(&command.name, command.description)?;
        let category = self.categories.save(category).await?;
        let id = category
            .id()
            .ok_or(RepositoryError::NotPersisted("Category"))?;

        tracing::info!(category_id = %id, "category created");
        Ok(id)
    }
}

pub struct UpdateCategoryHandler {
    categories: Arc<dyn CategoryRepository>,
}

impl UpdateCategoryHandler {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CommandHandler<UpdateCategory> for UpdateCategoryHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: UpdateCategory,
        _events: &EventRecorder,
    ) -> Result<(), DomainError> {
        let mut category = self
            .categories
            .get(command.id)
            .await?
            .ok_or(CategoryError::NotFound(command.id))?;

        category.update(&command.name, command.description)?;
        self.categories.save(category).await?;
        Ok(())
    }
}

pub struct DeleteCategoryHandler {
    categories: Arc<dyn CategoryRepository>,
}

impl DeleteCategoryHandler {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CommandHandler<DeleteCategory> for DeleteCategoryHandler {
    #[tracing::instrument(skip(self, _events))]
    async fn handle(
        &self,
        command: DeleteCategory,
        _events: &EventRecorder,
    ) -> Result<(), DomainError> {
        let category = self
            .categories
            .get(command.id)
            .await?
            .ok_or(CategoryError::NotFound(command.id))?;

        self.categories.delete(&category).await?;
        tracing::info!(category_id = %command.id, "category deleted");
        Ok(())
    }
}
