use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{EntityId, Page, PageRequest};
use domain::{
    Author, AuthorRepository, Book, BookDetails, BookRepository, BooksByAuthor, Category,
    CategoryRepository, ReportRepository, Repositories, Repository, RepositoryError, Role,
    Subject, SubjectRepository, User, UserProfile, UserRepository,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::error::{StorageError, db};

fn ids_param(ids: &[EntityId]) -> Vec<i64> {
    ids.iter().map(EntityId::as_i64).collect()
}

/// A PostgreSQL connection pool and the repositories built on it.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        tracing::info!(max_connections, "connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the embedded migrations.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        let migrator = sqlx::migrate!("../../migrations");
        migrator.run(&self.pool).await?;
        tracing::info!(
            migrations = migrator.iter().count(),
            "database migrations applied"
        );
        Ok(())
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            authors: Arc::new(PgAuthorRepository::new(self.pool.clone())),
            subjects: Arc::new(PgSubjectRepository::new(self.pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(self.pool.clone())),
            books: Arc::new(PgBookRepository::new(self.pool.clone())),
            users: Arc::new(PgUserRepository::new(self.pool.clone())),
            reports: Arc::new(PgReportRepository::new(self.pool.clone())),
        }
    }
}

// Authors

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: PgPool,
}

impl PgAuthorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_author(row: PgRow) -> Result<Author, sqlx::Error> {
        Ok(Author::restore(
            EntityId::new(row.try_get("id")?),
            row.try_get("name")?,
        ))
    }
}

#[async_trait]
impl Repository<Author> for PgAuthorRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Author>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM authors WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.map(Self::row_to_author).transpose().map_err(db)
    }

    async fn get_all(&self) -> Result<Vec<Author>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.into_iter()
            .map(Self::row_to_author)
            .collect::<Result<_, _>>()
            .map_err(db)
    }

    async fn save(&self, author: Author) -> Result<Author, RepositoryError> {
        match author.id() {
            None => {
                let id: i64 = sqlx::query_scalar("INSERT INTO authors (name) VALUES ($1) RETURNING id")
                    .bind(author.name())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(db)?;
                Ok(author.with_id(EntityId::new(id)))
            }
            Some(id) => {
                let result = sqlx::query("UPDATE authors SET name = $2 WHERE id = $1")
                    .bind(id.as_i64())
                    .bind(author.name())
                    .execute(&self.pool)
                    .await
                    .map_err(db)?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::Gone {
                        entity: "Author",
                        id,
                    });
                }
                Ok(author)
            }
        }
    }

    async fn delete(&self, author: &Author) -> Result<(), RepositoryError> {
        let id = author.id().ok_or(RepositoryError::NotPersisted("Author"))?;
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Author>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query("SELECT id, name FROM authors WHERE id = ANY($1) ORDER BY id")
            .bind(ids_param(ids))
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.into_iter()
            .map(Self::row_to_author)
            .collect::<Result<_, _>>()
            .map_err(db)
    }
}

// Subjects

#[derive(Clone)]
pub struct PgSubjectRepository {
    pool: PgPool,
}

impl PgSubjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_subject(row: PgRow) -> Result<Subject, sqlx::Error> {
        Ok(Subject::restore(
            EntityId::new(row.try_get("id")?),
            row.try_get("description")?,
        ))
    }
}

#[async_trait]
impl Repository<Subject> for PgSubjectRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Subject>, RepositoryError> {
        let row = sqlx::query("SELECT id, description FROM subjects WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.map(Self::row_to_subject).transpose().map_err(db)
    }

    async fn get_all(&self) -> Result<Vec<Subject>, RepositoryError> {
        let rows = sqlx::query("SELECT id, description FROM subjects ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.into_iter()
            .map(Self::row_to_subject)
            .collect::<Result<_, _>>()
            .map_err(db)
    }

    async fn save(&self, subject: Subject) -> Result<Subject, RepositoryError> {
        match subject.id() {
            None => {
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO subjects (description) VALUES ($1) RETURNING id",
                )
                .bind(subject.description())
                .fetch_one(&self.pool)
                .await
                .map_err(db)?;
                Ok(subject.with_id(EntityId::new(id)))
            }
            Some(id) => {
                let result = sqlx::query("UPDATE subjects SET description = $2 WHERE id = $1")
                    .bind(id.as_i64())
                    .bind(subject.description())
                    .execute(&self.pool)
                    .await
                    .map_err(db)?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::Gone {
                        entity: "Subject",
                        id,
                    });
                }
                Ok(subject)
            }
        }
    }

    async fn delete(&self, subject: &Subject) -> Result<(), RepositoryError> {
        let id = subject.id().ok_or(RepositoryError::NotPersisted("Subject"))?;
        sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }
}

#[async_trait]
impl SubjectRepository for PgSubjectRepository {
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Subject>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows =
            sqlx::query("SELECT id, description FROM subjects WHERE id = ANY($1) ORDER BY id")
                .bind(ids_param(ids))
                .fetch_all(&self.pool)
                .await
                .map_err(db)?;
        rows.into_iter()
            .map(Self::row_to_subject)
            .collect::<Result<_, _>>()
            .map_err(db)
    }
}

// Categories

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_category(row: PgRow) -> Result<Category, sqlx::Error> {
        Ok(Category::restore(
            EntityId::new(row.try_get("id")?),
            row.try_get("name")?,
            row.try_get("description")?,
        ))
    }
}

#[async_trait]
impl Repository<Category> for PgCategoryRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, description FROM categories WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.map(Self::row_to_category).transpose().map_err(db)
    }

    async fn get_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.into_iter()
            .map(Self::row_to_category)
            .collect::<Result<_, _>>()
            .map_err(db)
    }

    async fn save(&self, category: Category) -> Result<Category, RepositoryError> {
        match category.id() {
            None => {
                let id: i64 = sqlx::query_scalar(
                    "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id",
                )
                .bind(category.name())
                .bind(category.description())
                .fetch_one(&self.pool)
                .await
                .map_err(db)?;
                Ok(category.with_id(EntityId::new(id)))
            }
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE categories SET name = $2, description = $3 WHERE id = $1",
                )
                .bind(id.as_i64())
                .bind(category.name())
                .bind(category.description())
                .execute(&self.pool)
                .await
                .map_err(db)?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::Gone {
                        entity: "Category",
                        id,
                    });
                }
                Ok(category)
            }
        }
    }

    async fn delete(&self, category: &Category) -> Result<(), RepositoryError> {
        let id = category
            .id()
            .ok_or(RepositoryError::NotPersisted("Category"))?;
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Category>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, name, description FROM categories WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids_param(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;
        rows.into_iter()
            .map(Self::row_to_category)
            .collect::<Result<_, _>>()
            .map_err(db)
    }
}

// Books

const BOOK_COLUMNS: &str = "id, title, edition, publish_year, price, publisher";

#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_details(row: &PgRow) -> Result<(i64, BookDetails), sqlx::Error> {
        let details = BookDetails {
            title: row.try_get("title")?,
            edition: row.try_get("edition")?,
            publish_year: row.try_get("publish_year")?,
            price: row.try_get("price")?,
            publisher: row.try_get("publisher")?,
        };
        Ok((row.try_get("id")?, details))
    }

    /// Loads the relations of the given books, keyed by book id.
    async fn load_relations(
        &self,
        book_ids: &[i64],
    ) -> Result<(HashMap<i64, Vec<Subject>>, HashMap<i64, Vec<Author>>), sqlx::Error> {
        let mut subjects: HashMap<i64, Vec<Subject>> = HashMap::new();
        let rows = sqlx::query(
            r#"
            SELECT bs.book_id, s.id, s.description
            FROM books_subjects bs
            JOIN subjects s ON s.id = bs.subject_id
            WHERE bs.book_id = ANY($1)
            ORDER BY bs.book_id, s.id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let book_id: i64 = row.try_get("book_id")?;
            let subject = PgSubjectRepository::row_to_subject(row)?;
            subjects.entry(book_id).or_default().push(subject);
        }

        let mut authors: HashMap<i64, Vec<Author>> = HashMap::new();
        let rows = sqlx::query(
            r#"
            SELECT ba.book_id, a.id, a.name
            FROM books_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = ANY($1)
            ORDER BY ba.book_id, a.id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            let book_id: i64 = row.try_get("book_id")?;
            let author = PgAuthorRepository::row_to_author(row)?;
            authors.entry(book_id).or_default().push(author);
        }

        Ok((subjects, authors))
    }

    async fn hydrate(&self, rows: Vec<PgRow>) -> Result<Vec<Book>, sqlx::Error> {
        let books = rows
            .iter()
            .map(Self::row_to_details)
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<i64> = books.iter().map(|(id, _)| *id).collect();
        let (mut subjects, mut authors) = self.load_relations(&ids).await?;

        Ok(books
            .into_iter()
            .map(|(id, details)| {
                Book::restore(
                    EntityId::new(id),
                    details,
                    subjects.remove(&id).unwrap_or_default(),
                    authors.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl Repository<Book> for PgBookRepository {
    async fn get(&self, id: EntityId) -> Result<Option<Book>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        Ok(self.hydrate(rows).await.map_err(db)?.into_iter().next())
    }

    async fn get_all(&self) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        self.hydrate(rows).await.map_err(db)
    }

    async fn save(&self, book: Book) -> Result<Book, RepositoryError> {
        let details = book.details();
        let mut tx = self.pool.begin().await.map_err(db)?;

        let id = match book.id() {
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO books (title, edition, publish_year, price, publisher)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&details.title)
                .bind(details.edition)
                .bind(&details.publish_year)
                .bind(details.price)
                .bind(&details.publisher)
                .fetch_one(&mut *tx)
                .await
                .map_err(db)?;
                EntityId::new(id)
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE books
                    SET title = $2, edition = $3, publish_year = $4, price = $5, publisher = $6
                    WHERE id = $1
                    "#,
                )
                .bind(id.as_i64())
                .bind(&details.title)
                .bind(details.edition)
                .bind(&details.publish_year)
                .bind(details.price)
                .bind(&details.publisher)
                .execute(&mut *tx)
                .await
                .map_err(db)?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::Gone { entity: "Book", id });
                }
                sqlx::query("DELETE FROM books_authors WHERE book_id = $1")
                    .bind(id.as_i64())
                    .execute(&mut *tx)
                    .await
                    .map_err(db)?;
                sqlx::query("DELETE FROM books_subjects WHERE book_id = $1")
                    .bind(id.as_i64())
                    .execute(&mut *tx)
                    .await
                    .map_err(db)?;
                id
            }
        };

        // Selecting through the parent table drops ids deleted meanwhile.
        sqlx::query(
            "INSERT INTO books_authors (book_id, author_id) SELECT $1, id FROM authors WHERE id = ANY($2)",
        )
        .bind(id.as_i64())
        .bind(ids_param(&book.author_ids()))
        .execute(&mut *tx)
        .await
        .map_err(db)?;
        sqlx::query(
            "INSERT INTO books_subjects (book_id, subject_id) SELECT $1, id FROM subjects WHERE id = ANY($2)",
        )
        .bind(id.as_i64())
        .bind(ids_param(&book.subject_ids()))
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        tx.commit().await.map_err(db)?;
        Ok(book.with_id(id))
    }

    async fn delete(&self, book: &Book) -> Result<(), RepositoryError> {
        let id = book.id().ok_or(RepositoryError::NotPersisted("Book"))?;
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }
}

impl BookRepository for PgBookRepository {}

// Users

const USER_COLUMNS: &str = "id, email, roles, password, name, avatar, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: PgRow) -> Result<User, StorageError> {
        let roles: serde_json::Value = row.try_get("roles")?;
        let roles: Vec<Role> = serde_json::from_value(roles)?;
        let profile = UserProfile {
            email: row.try_get("email")?,
            roles,
            name: row.try_get("name")?,
            avatar: row.try_get("avatar")?,
        };
        Ok(User::restore(
            EntityId::new(row.try_get("id")?),
            profile,
            row.try_get("password")?,
            row.try_get("created_at")?,
            row.try_get("updated_at")?,
        ))
    }

    fn rows_to_users(rows: Vec<PgRow>) -> Result<Vec<User>, RepositoryError> {
        Ok(rows
            .into_iter()
            .map(Self::row_to_user)
            .collect::<Result<_, _>>()?)
    }

    fn roles_param(user: &User) -> Result<serde_json::Value, RepositoryError> {
        serde_json::to_value(user.stored_roles())
            .map_err(|e| RepositoryError::from(StorageError::from(e)))
    }
}

/// Turns a free-text search into an ILIKE pattern matching it literally.
fn contains_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl Repository<User> for PgUserRepository {
    async fn get(&self, id: EntityId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM app_user WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        Ok(row.map(Self::row_to_user).transpose()?)
    }

    async fn get_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM app_user ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        Self::rows_to_users(rows)
    }

    async fn save(&self, user: User) -> Result<User, RepositoryError> {
        let roles = Self::roles_param(&user)?;
        match user.id() {
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO app_user (email, roles, password, name, avatar, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING id
                    "#,
                )
                .bind(user.email())
                .bind(roles)
                .bind(user.password_hash())
                .bind(user.name())
                .bind(user.avatar())
                .bind(user.created_at())
                .bind(user.updated_at())
                .fetch_one(&self.pool)
                .await
                .map_err(db)?;
                Ok(user.with_id(EntityId::new(id)))
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE app_user
                    SET email = $2, roles = $3, password = $4, name = $5, avatar = $6, updated_at = $7
                    WHERE id = $1
                    "#,
                )
                .bind(id.as_i64())
                .bind(user.email())
                .bind(roles)
                .bind(user.password_hash())
                .bind(user.name())
                .bind(user.avatar())
                .bind(user.updated_at())
                .execute(&self.pool)
                .await
                .map_err(db)?;
                if result.rows_affected() == 0 {
                    return Err(RepositoryError::Gone { entity: "User", id });
                }
                Ok(user)
            }
        }
    }

    async fn delete(&self, user: &User) -> Result<(), RepositoryError> {
        let id = user.id().ok_or(RepositoryError::NotPersisted("User"))?;
        sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(db)?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db)?;
        Ok(row.map(Self::row_to_user).transpose()?)
    }

    async fn get_paginated(
        &self,
        request: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<User>, RepositoryError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(contains_pattern);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM app_user WHERE ($1::text IS NULL OR email ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(db)?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM app_user
            WHERE ($1::text IS NULL OR email ILIKE $1)
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(pattern.as_deref())
        .bind(i64::from(request.limit()))
        .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        let users = Self::rows_to_users(rows)?;
        Ok(Page::new(users, u64::try_from(total).unwrap_or_default()))
    }

    async fn get_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM app_user WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(ids_param(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;
        Self::rows_to_users(rows)
    }
}

// Reports

#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn books_by_author(&self) -> Result<Vec<BooksByAuthor>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT author_id, author_name, book_titles, subjects FROM books_by_author ORDER BY author_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db)?;

        rows.into_iter()
            .map(|row| -> Result<BooksByAuthor, sqlx::Error> {
                Ok(BooksByAuthor {
                    author_id: EntityId::new(row.try_get("author_id")?),
                    author_name: row.try_get("author_name")?,
                    book_titles: row.try_get("book_titles")?,
                    subjects: row.try_get("subjects")?,
                })
            })
            .collect::<Result<_, _>>()
            .map_err(db)
    }
}
