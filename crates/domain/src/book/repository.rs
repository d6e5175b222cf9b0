use super::Book;
use crate::repository::Repository;

/// Storage for books. Saving a book also replaces its author and subject
/// relations.
pub trait BookRepository: Repository<Book> {}
