use async_trait::async_trait;
use common::{EntityId, Page, PageRequest};

use super::User;
use crate::error::RepositoryError;
use crate::repository::Repository;

#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Exact, case-sensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// One page of users, newest id first. `search` keeps users whose email
    /// contains it, ignoring case.
    async fn get_paginated(
        &self,
        request: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<User>, RepositoryError>;

    /// Loads the users with the given ids. Unknown ids are skipped.
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>, RepositoryError>;
}
