use common::EntityId;

use crate::command::Command;

#[derive(Debug, Clone)]
pub struct CreateSubject {
    pub description: String,
}

impl Command for CreateSubject {
    const NAME: &'static str = "CreateSubject";
    type Output = EntityId;
}

#[derive(Debug, Clone)]
pub struct UpdateSubject {
    pub id: EntityId,
    pub description: String,
}

impl Command for UpdateSubject {
    const NAME: &'static str = "UpdateSubject";
    type Output = ();
}

#[derive(Debug, Clone)]
pub struct DeleteSubject {
    pub id: EntityId,
}

impl Command for DeleteSubject {
    const NAME: &'static str = "DeleteSubject";
    type Output = ();
}
