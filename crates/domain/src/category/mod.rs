//! Categories used to group the catalog.

mod commands;
mod factory;
mod handlers;
mod repository;

use common::EntityId;
use serde::Serialize;
use thiserror::Error;

use crate::text::{exceeds, is_blank};

pub use commands::{CreateCategory, DeleteCategory, UpdateCategory};
pub use factory::CategoryFactory;
pub use handlers::{CreateCategoryHandler, DeleteCategoryHandler, UpdateCategoryHandler};
pub use repository::CategoryRepository;

pub const NAME_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("Category name is required")]
    NameRequired,

    #[error("Category name cannot be longer than {max} characters")]
    NameTooLong { max: usize },

    #[error("Category description cannot be longer than {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("Category {0} not found")]
    NotFound(EntityId),
}

/// A named category with an optional description.
///
/// Names are stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    id: Option<EntityId>,
    name: String,
    description: Option<String>,
}

impl Category {
    pub fn new(name: &str, description: Option<String>) -> Result<Self, CategoryError> {
        let name = normalize_name(name)?;
        validate_description(description.as_deref())?;
        Ok(Self {
            id: None,
            name,
            description,
        })
    }

    pub fn restore(id: EntityId, name: String, description: Option<String>) -> Self {
        Self {
            id: Some(id),
            name,
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

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Replaces name and description together. `None` clears the
    /// description.
    pub fn update(&mut self, name: &str, description: Option<String>) -> Result<(), CategoryError> {
        let name = normalize_name(name)?;
        validate_description(description.as_deref())?;
        self.name = name;
        self.description = description;
        Ok(())
    }
}

fn normalize_name(name: &str) -> Result<String, CategoryError> {
    if is_blank(name) {
        return Err(CategoryError::NameRequired);
    }
    let name = name.trim();
    if exceeds(name, NAME_MAX_LEN) {
        return Err(CategoryError::NameTooLong { max: NAME_MAX_LEN });
    }
    Ok(name.to_string())
}

fn validate_description(description: Option<&str>) -> Result<(), CategoryError> {
    match description {
        Some(d) if exceeds(d, DESCRIPTION_MAX_LEN) => Err(CategoryError::DescriptionTooLong {
            max: DESCRIPTION_MAX_LEN,
        }),
        _ => Ok(()),
    }
}
