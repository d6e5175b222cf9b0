use async_trait::async_trait;
use common::EntityId;

use super::Category;
use crate::error::RepositoryError;
use crate::repository::Repository;

#[async_trait]
pub trait CategoryRepository: Repository<Category> {
    /// Loads the categories with the given ids. Unknown ids are skipped.
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Category>, RepositoryError>;
}
