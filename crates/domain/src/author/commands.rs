use common::EntityId;

use crate::command::Command;

/// Registers a new author. Returns the new author's id.
#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
}

impl Command for CreateAuthor {
    const NAME: &'static str = "CreateAuthor";
    type Output = EntityId;
}

/// Renames an existing author.
#[derive(Debug, Clone)]
pub struct UpdateAuthor {
    pub id: EntityId,
    pub name: String,
}

impl Command for UpdateAuthor {
    const NAME: &'static str = "UpdateAuthor";
    type Output = ();
}

/// Removes an author, detaching it from its books.
#[derive(Debug, Clone)]
pub struct DeleteAuthor {
    pub id: EntityId,
}

impl Command for DeleteAuthor {
    const NAME: &'static str = "DeleteAuthor";
    type Output = ();
}
