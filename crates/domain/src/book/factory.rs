use super::{Book, BookDetails, BookError};
use crate::author::Author;
use crate::subject::Subject;

#[derive(Debug, Default, Clone, Copy)]
pub struct BookFactory;

impl BookFactory {
    pub fn create(
        &self,
        details: BookDetails,
        subjects: Vec<Subject>,
        authors: Vec<Author>,
    ) -> Result<Book, BookError> {
        Book::new(details, subjects, authors)
    }
}
