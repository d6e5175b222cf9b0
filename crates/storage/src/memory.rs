use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use common::{EntityId, Page, PageRequest};
use domain::{
    Author, AuthorRepository, Book, BookDetails, BookRepository, BooksByAuthor, Category,
    CategoryRepository, ReportRepository, Repositories, Repository, RepositoryError, Subject,
    SubjectRepository, User, UserRepository,
};
use tokio::sync::RwLock;

/// Name reported when the in-memory email index rejects a write.
pub const USER_EMAIL_CONSTRAINT: &str = "app_user_email_key";

#[derive(Debug, Clone)]
struct BookRow {
    details: BookDetails,
    subject_ids: Vec<EntityId>,
    author_ids: Vec<EntityId>,
}

#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> EntityId {
        self.0 += 1;
        EntityId::new(self.0)
    }
}

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<EntityId, Author>,
    subjects: BTreeMap<EntityId, Subject>,
    categories: BTreeMap<EntityId, Category>,
    books: BTreeMap<EntityId, BookRow>,
    users: BTreeMap<EntityId, User>,
    author_seq: Sequence,
    subject_seq: Sequence,
    category_seq: Sequence,
    book_seq: Sequence,
    user_seq: Sequence,
}

impl Tables {
    fn hydrate(&self, id: EntityId, row: &BookRow) -> Book {
        let subjects = row
            .subject_ids
            .iter()
            .filter_map(|id| self.subjects.get(id).cloned())
            .collect();
        let authors = row
            .author_ids
            .iter()
            .filter_map(|id| self.authors.get(id).cloned())
            .collect();
        Book::restore(id, row.details.clone(), subjects, authors)
    }

    fn email_taken(&self, email: &str, except: Option<EntityId>) -> bool {
        self.users
            .values()
            .any(|u| u.email() == email && u.id() != except)
    }
}

fn sorted_unique(ids: Vec<EntityId>) -> Vec<EntityId> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// In-process tables shared by every in-memory repository.
///
/// Ids come from per-table sequences starting at 1. Deleting an author or
/// subject removes it from every book, mirroring the cascading foreign keys
/// of the PostgreSQL schema.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositories over this database.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            authors: Arc::new(InMemoryAuthorRepository(self.clone())),
            subjects: Arc::new(InMemorySubjectRepository(self.clone())),
            categories: Arc::new(InMemoryCategoryRepository(self.clone())),
            books: Arc::new(InMemoryBookRepository(self.clone())),
            users: Arc::new(InMemoryUserRepository(self.clone())),
            reports: Arc::new(InMemoryReportRepository(self.clone())),
        }
    }

    /// Number of stored books.
    pub async fn book_count(&self) -> usize {
        self.tables.read().await.books.len()
    }

    /// Drops every row and resets the sequences.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

#[derive(Clone)]
pub struct InMemoryAuthorRepository(InMemoryDatabase);

#[async_trait]
impl Repository<Author> for InMemoryAuthorRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Author>, RepositoryError> {
        Ok(self.0.tables.read().await.authors.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Author>, RepositoryError> {
        Ok(self.0.tables.read().await.authors.values().cloned().collect())
    }

    async fn save(&self, author: Author) -> Result<Author, RepositoryError> {
        let mut tables = self.0.tables.write().await;
        let author = match author.id() {
            Some(id) if !tables.authors.contains_key(&id) => {
                return Err(RepositoryError::Gone {
                    entity: "Author",
                    id,
                });
            }
            Some(_) => author,
            None => {
                let id = tables.author_seq.next();
                author.with_id(id)
            }
        };
        if let Some(id) = author.id() {
            tables.authors.insert(id, author.clone());
        }
        Ok(author)
    }

    async fn delete(&self, author: &Author) -> Result<(), RepositoryError> {
        let id = author.id().ok_or(RepositoryError::NotPersisted("Author"))?;
        let mut tables = self.0.tables.write().await;
        tables.authors.remove(&id);
        for book in tables.books.values_mut() {
            book.author_ids.retain(|a| *a != id);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Author>, RepositoryError> {
        let tables = self.0.tables.read().await;
        Ok(sorted_unique(ids.to_vec())
            .iter()
            .filter_map(|id| tables.authors.get(id).cloned())
            .collect())
    }
}

#[derive(Clone)]
pub struct InMemorySubjectRepository(InMemoryDatabase);

#[async_trait]
impl Repository<Subject> for InMemorySubjectRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Subject>, RepositoryError> {
        Ok(self.0.tables.read().await.subjects.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Subject>, RepositoryError> {
        Ok(self.0.tables.read().await.subjects.values().cloned().collect())
    }

    async fn save(&self, subject: Subject) -> Result<Subject, RepositoryError> {
        let mut tables = self.0.tables.write().await;
        let subject = match subject.id() {
            Some(id) if !tables.subjects.contains_key(&id) => {
                return Err(RepositoryError::Gone {
                    entity: "Subject",
                    id,
                });
            }
            Some(_) => subject,
            None => {
                let id = tables.subject_seq.next();
                subject.with_id(id)
            }
        };
        if let Some(id) = subject.id() {
            tables.subjects.insert(id, subject.clone());
        }
        Ok(subject)
    }

    async fn delete(&self, subject: &Subject) -> Result<(), RepositoryError> {
        let id = subject.id().ok_or(RepositoryError::NotPersisted("Subject"))?;
        let mut tables = self.0.tables.write().await;
        tables.subjects.remove(&id);
        for book in tables.books.values_mut() {
            book.subject_ids.retain(|s| *s != id);
        }
        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for InMemorySubjectRepository {
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Subject>, RepositoryError> {
        let tables = self.0.tables.read().await;
        Ok(sorted_unique(ids.to_vec())
            .iter()
            .filter_map(|id| tables.subjects.get(id).cloned())
            .collect())
    }
}

#[derive(Clone)]
pub struct InMemoryCategoryRepository(InMemoryDatabase);

#[async_trait]
impl Repository<Category> for InMemoryCategoryRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.0.tables.read().await.categories.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .0
            .tables
            .read()
            .await
            .categories
            .values()
            .cloned()
            .collect())
    }

    async fn save(&self, category: Category) -> Result<Category, RepositoryError> {
        let mut tables = self.0.tables.write().await;
        let category = match category.id() {
            Some(id) if !tables.categories.contains_key(&id) => {
                return Err(RepositoryError::Gone {
                    entity: "Category",
                    id,
                });
            }
            Some(_) => category,
            None => {
                let id = tables.category_seq.next();
                category.with_id(id)
            }
        };
        if let Some(id) = category.id() {
            tables.categories.insert(id, category.clone());
        }
        Ok(category)
    }

    async fn delete(&self, category: &Category) -> Result<(), RepositoryError> {
        let id = category
            .id()
            .ok_or(RepositoryError::NotPersisted("Category"))?;
        self.0.tables.write().await.categories.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Category>, RepositoryError> {
        let tables = self.0.tables.read().await;
        Ok(sorted_unique(ids.to_vec())
            .iter()
            .filter_map(|id| tables.categories.get(id).cloned())
            .collect())
    }
}

#[derive(Clone)]
pub struct InMemoryBookRepository(InMemoryDatabase);

#[async_trait]
impl Repository<Book> for InMemoryBookRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Book>, RepositoryError> {
        let tables = self.0.tables.read().await;
        Ok(tables.books.get(&id).map(|row| tables.hydrate(id, row)))
    }

    async fn get_all(&self) -> Result<Vec<Book>, RepositoryError> {
        let tables = self.0.tables.read().await;
        Ok(tables
            .books
            .iter()
            .map(|(id, row)| tables.hydrate(*id, row))
            .collect())
    }

    async fn save(&self, book: Book) -> Result<Book, RepositoryError> {
        let mut tables = self.0.tables.write().await;
        let id = match book.id() {
            Some(id) if !tables.books.contains_key(&id) => {
                return Err(RepositoryError::Gone { entity: "Book", id });
            }
            Some(id) => id,
            None => tables.book_seq.next(),
        };

        // Relations to rows that no longer exist are dropped, as a foreign
        // key would refuse them.
        let author_ids = sorted_unique(book.author_ids())
            .into_iter()
            .filter(|a| tables.authors.contains_key(a))
            .collect();
        let subject_ids = sorted_unique(book.subject_ids())
            .into_iter()
            .filter(|s| tables.subjects.contains_key(s))
            .collect();
        let row = BookRow {
            details: book.details().clone(),
            subject_ids,
            author_ids,
        };
        let stored = tables.hydrate(id, &row);
        tables.books.insert(id, row);
        Ok(stored)
    }

    async fn delete(&self, book: &Book) -> Result<(), RepositoryError> {
        let id = book.id().ok_or(RepositoryError::NotPersisted("Book"))?;
        self.0.tables.write().await.books.remove(&id);
        Ok(())
    }
}

impl BookRepository for InMemoryBookRepository {}

#[derive(Clone)]
pub struct InMemoryUserRepository(InMemoryDatabase);

#[async_trait]
impl Repository<User> for InMemoryUserRepository {
    async fn get(&self, id: EntityId) -> Result<Option<User>, RepositoryError> {
        Ok(self.0.tables.read().await.users.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.0.tables.read().await.users.values().cloned().collect())
    }

    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let mut tables = self.0.tables.write().await;
        if tables.email_taken(user.email(), user.id()) {
            return Err(RepositoryError::UniqueViolation(
                USER_EMAIL_CONSTRAINT.to_string(),
            ));
        }
        let user = match user.id() {
            Some(id) if !tables.users.contains_key(&id) => {
                return Err(RepositoryError::Gone { entity: "User", id });
            }
            Some(_) => user,
            None => {
                let id = tables.user_seq.next();
                user.with_id(id)
            }
        };
        if let Some(id) = user.id() {
            tables.users.insert(id, user.clone());
        }
        Ok(user)
    }

    async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
        let id = user.id().ok_or(RepositoryError::NotPersisted("User"))?;
        self.0.tables.write().await.users.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.0.tables.read().await;
        Ok(tables.users.values().find(|u| u.email() == email).cloned())
    }

    async fn get_paginated(
        &self,
        request: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<User>, RepositoryError> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let tables = self.0.tables.read().await;

        let matching: Vec<&User> = tables
            .users
            .values()
            .rev()
            .filter(|u| {
                needle
                    .as_deref()
                    .is_none_or(|n| u.email().to_lowercase().contains(n))
            })
            .collect();

        let total = matching.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(request.limit() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, total))
    }

    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>, RepositoryError> {
        let tables = self.0.tables.read().await;
        Ok(sorted_unique(ids.to_vec())
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}

#[derive(Clone)]
pub struct InMemoryReportRepository(InMemoryDatabase);

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn books_by_author(&self) -> Result<Vec<BooksByAuthor>, RepositoryError> {
        let tables = self.0.tables.read().await;
        let rows = tables
            .authors
            .values()
            .filter_map(|author| {
                let id = author.id()?;
                let books: Vec<&BookRow> = tables
                    .books
                    .values()
                    .filter(|b| b.author_ids.contains(&id))
                    .collect();
                let titles = books.iter().map(|b| b.details.title.clone());
                let subjects = books
                    .iter()
                    .flat_map(|b| b.subject_ids.iter())
                    .filter_map(|s| tables.subjects.get(s))
                    .map(|s| s.description().to_string());
                Some(BooksByAuthor::collect(
                    id,
                    author.name().to_string(),
                    titles,
                    subjects,
                ))
            })
            .collect();
        Ok(rows)
    }
}
