use async_trait::async_trait;
use common::EntityId;

use super::Author;
use crate::error::RepositoryError;
use crate::repository::Repository;

#[async_trait]
pub trait AuthorRepository: Repository<Author> {
    /// Loads the authors with the given ids, ordered by id. Unknown ids are
    /// skipped.
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Author>, RepositoryError>;
}
