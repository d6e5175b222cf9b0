//! Subjects books are filed under.

mod commands;
mod factory;
mod handlers;
mod repository;

use common::EntityId;
use serde::Serialize;
use thiserror::Error;

use crate::text::{exceeds, is_blank};

pub use commands::{CreateSubject, DeleteSubject, UpdateSubject};
pub use factory::SubjectFactory;
pub use handlers::{CreateSubjectHandler, DeleteSubjectHandler, UpdateSubjectHandler};
pub use repository::SubjectRepository;

pub const DESCRIPTION_MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    #[error("Subject description is required")]
    DescriptionRequired,

    #[error("Subject description cannot be longer than {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("Subject {0} not found")]
    NotFound(EntityId),
}

/// A subject such as "Poetry" or "History".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    id: Option<EntityId>,
    description: String,
}

impl Subject {
    pub fn new(description: impl Into<String>) -> Result<Self, SubjectError> {
        let description = description.into();
        validate_description(&description)?;
        Ok(Self {
            id: None,
            description,
        })
    }

    pub fn restore(id: EntityId, description: String) -> Self {
        Self {
            id: Some(id),
            description,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn describe(&mut self, description: impl Into<String>) -> Result<(), SubjectError> {
        let description = description.into();
        validate_description(&description)?;
        self.description = description;
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<(), SubjectError> {
    if is_blank(description) {
        return Err(SubjectError::DescriptionRequired);
    }
    if exceeds(description, DESCRIPTION_MAX_LEN) {
        return Err(SubjectError::DescriptionTooLong {
            max: DESCRIPTION_MAX_LEN,
        });
    }
    Ok(())
}
