use common::EntityId;

use crate::command::Command;

#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: Option<String>,
}

impl Command for CreateCategory {
    const NAME: &'static str = "CreateCategory";
    type Output = EntityId;
}

/// Replaces a category's name and description.
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
}

impl Command for UpdateCategory {
    const NAME: &'static str = "UpdateCategory";
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct DeleteCategory {
    pub id: EntityId,
}

impl Command for DeleteCategory {
    const NAME: &'static str = "DeleteCategory";
    type Output = ();
}
