use super::{Author, AuthorError};

/// Builds new authors from raw input.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorFactory;

impl AuthorFactory {
    pub fn create(&self, name: &str) -> Result<Author, AuthorError> {
        Author::new(name)
    }
}
