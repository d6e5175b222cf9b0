//! Read-side reports over the catalog.

use async_trait::async_trait;
use common::EntityId;
use serde::Serialize;

use crate::error::RepositoryError;

/// One row of the books-by-author report.
///
/// `book_titles` and `subjects` hold the distinct values, sorted bytewise and
/// joined with `", "`; they are `None` when the author has no books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksByAuthor {
    pub author_id: EntityId,
    pub author_name: String,
    pub book_titles: Option<String>,
    pub subjects: Option<String>,
}

impl BooksByAuthor {
    /// Builds a row from the raw, possibly repeated values.
    pub fn collect<T, S>(author_id: EntityId, author_name: String, titles: T, subjects: S) -> Self
    where
        T: IntoIterator<Item = String>,
        S: IntoIterator<Item = String>,
    {
        Self {
            author_id,
            author_name,
            book_titles: join_distinct(titles),
            subjects: join_distinct(subjects),
        }
    }
}

fn join_distinct(values: impl IntoIterator<Item = String>) -> Option<String> {
    let mut values: Vec<String> = values.into_iter().collect();
    values.sort();
    values.dedup();
    (!values.is_empty()).then(|| values.join(", "))
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// One row per author, ordered by author id.
    async fn books_by_author(&self) -> Result<Vec<BooksByAuthor>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_sorts_and_dedups() {
        let row = BooksByAuthor::collect(
            EntityId::new(1),
            "Borges".to_string(),
            ["Ficciones", "El Aleph", "Ficciones"].map(String::from),
            ["Short stories", "Short stories"].map(String::from),
        );

        assert_eq!(row.book_titles.as_deref(), Some("El Aleph, Ficciones"));
        assert_eq!(row.subjects.as_deref(), Some("Short stories"));
    }

    #[test]
    fn collect_sorts_bytewise_regardless_of_case() {
        let row = BooksByAuthor::collect(
            EntityId::new(1),
            "Borges".to_string(),
            ["apple", "Zebra"].map(String::from),
            Vec::new(),
        );

        assert_eq!(row.book_titles.as_deref(), Some("Zebra, apple"));
    }

    #[test]
    fn author_without_books_has_empty_columns() {
        let row = BooksByAuthor::collect(
            EntityId::new(2),
            "Nobody".to_string(),
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(row.book_titles, None);
        assert_eq!(row.subjects, None);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["authorId"], 2);
        assert!(json["bookTitles"].is_null());
    }
}
