use async_trait::async_trait;
use common::EntityId;

use super::Subject;
use crate::error::RepositoryError;
use crate::repository::Repository;

#[async_trait]
pub trait SubjectRepository: Repository<Subject> {
    /// Loads the subjects with the given ids. Unknown ids are skipped.
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Subject>, RepositoryError>;
}
