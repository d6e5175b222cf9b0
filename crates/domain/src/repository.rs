//! Repository base trait shared by every entity repository.

use async_trait::async_trait;
use common::EntityId;

use crate::error::RepositoryError;

/// Persistence operations common to every entity.
///
/// Entity-specific traits extend this one with their own lookups.
#[async_trait]
pub trait Repository<T: Send + Sync + 'static>: Send + Sync {
    /// Loads one entity, `None` if no entity has this id.
    async fn get(&self, id: EntityId) -> Result<Option<T>, RepositoryError>;

    /// Loads every entity, ordered by id.
    async fn get_all(&self) -> Result<Vec<T>, RepositoryError>;

    /// Inserts the entity when it has no id yet, updates it otherwise.
    /// Returns the stored entity, carrying its id.
    async fn save(&self, entity: T) -> Result<T, RepositoryError>;

    /// Removes a stored entity.
    async fn delete(&self, entity: &T) -> Result<(), RepositoryError>;
}
