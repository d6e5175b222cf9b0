use common::EntityId;

use super::BookDetails;
use crate::command::Command;

/// Adds a book. Unknown author and subject ids are ignored.
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub details: BookDetails,
    pub subject_ids: Vec<EntityId>,
    pub author_ids: Vec<EntityId>,
}

impl Command for CreateBook {
    const NAME: &'static str = "CreateBook";
    type Output = EntityId;
}

/// Replaces every field and relation of a book.
#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub id: EntityId,
    pub details: BookDetails,
    pub subject_ids: Vec<EntityId>,
    pub author_ids: Vec<EntityId>,
}

impl Command for UpdateBook {
    const NAME: &'static str = "UpdateBook";
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub id: EntityId,
}

impl Command for DeleteBook {
    const NAME: &'static str = "DeleteBook";
    type Output = ();
}
