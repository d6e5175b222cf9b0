use super::{Subject, SubjectError};

#[derive(Debug, Default, Clone, Copy)]
pub struct SubjectFactory;

impl SubjectFactory {
    pub fn create(&self, description: &str) -> Result<Subject, SubjectError> {
        Subject::new(description)
    }
}
