use super::{Category, CategoryError};

#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryFactory;

impl CategoryFactory {
    pub fn create(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Category, CategoryError> {
        Category::new(name, description)
    }
}
