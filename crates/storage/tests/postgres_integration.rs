//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p storage --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{EntityId, PageRequest};
use domain::{
    Author, Book, BookDetails, Category, Repositories, RepositoryError, Role, Subject, User,
    UserProfile,
};
use serial_test::serial;
use storage::PostgresDatabase;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let database = PostgresDatabase::connect(&connection_string, 1)
                .await
                .unwrap();
            database.run_migrations().await.unwrap();
            database.pool().close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Fresh repositories over emptied tables
async fn get_test_repositories() -> Repositories {
    let info = get_container_info().await;
    let database = PostgresDatabase::connect(&info.connection_string, 5)
        .await
        .unwrap();

    sqlx::query(
        "TRUNCATE TABLE books_authors, books_subjects, books, authors, subjects, categories, app_user RESTART IDENTITY CASCADE",
    )
    .execute(database.pool())
    .await
    .unwrap();

    database.repositories()
}

fn details(title: &str) -> BookDetails {
    BookDetails {
        title: title.to_string(),
        edition: 2,
        publish_year: "1962".to_string(),
        price: 2450,
        publisher: "Sur".to_string(),
    }
}

fn user(email: &str, roles: Vec<Role>) -> User {
    User::new(
        UserProfile {
            email: email.to_string(),
            roles,
            name: Some("Reader".to_string()),
            avatar: None,
        },
        "$argon2id$stub".to_string(),
    )
    .unwrap()
}

#[tokio::test]
#[serial]
async fn author_crud_round_trip() {
    let repos = get_test_repositories().await;

    let author = repos
        .authors
        .save(Author::new("Cortázar").unwrap())
        .await
        .unwrap();
    let id = author.id().unwrap();
    assert_eq!(id, EntityId::new(1));

    let mut loaded = repos.authors.get(id).await.unwrap().unwrap();
    loaded.rename("Julio Cortázar").unwrap();
    repos.authors.save(loaded).await.unwrap();

    let all = repos.authors.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name(), "Julio Cortázar");

    repos.authors.delete(&all[0]).await.unwrap();
    assert!(repos.authors.get(id).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn update_of_missing_row_is_gone() {
    let repos = get_test_repositories().await;

    let ghost = Category::restore(EntityId::new(42), "Ghost".to_string(), None);
    let err = repos.categories.save(ghost).await.unwrap_err();

    assert!(matches!(err, RepositoryError::Gone { entity: "Category", .. }));
}

#[tokio::test]
#[serial]
async fn category_description_is_optional() {
    let repos = get_test_repositories().await;

    let saved = repos
        .categories
        .save(Category::new(" Essays ", None).unwrap())
        .await
        .unwrap();

    let loaded = repos
        .categories
        .get(saved.id().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name(), "Essays");
    assert_eq!(loaded.description(), None);
}

#[tokio::test]
#[serial]
async fn book_relations_are_stored_and_cascade() {
    let repos = get_test_repositories().await;

    let a = repos.authors.save(Author::new("Bioy").unwrap()).await.unwrap();
    let b = repos.authors.save(Author::new("Borges").unwrap()).await.unwrap();
    let s = repos
        .subjects
        .save(Subject::new("Detective").unwrap())
        .await
        .unwrap();

    let book = repos
        .books
        .save(Book::new(details("Seis problemas"), vec![s.clone()], vec![a.clone(), b.clone()]).unwrap())
        .await
        .unwrap();
    let id = book.id().unwrap();

    let loaded = repos.books.get(id).await.unwrap().unwrap();
    assert_eq!(loaded.authors(), &[a.clone(), b.clone()]);
    assert_eq!(loaded.subjects(), &[s.clone()]);
    assert_eq!(loaded.details(), &details("Seis problemas"));

    repos.authors.delete(&a).await.unwrap();
    repos.subjects.delete(&s).await.unwrap();

    let loaded = repos.books.get(id).await.unwrap().unwrap();
    assert_eq!(loaded.authors(), &[b]);
    assert!(loaded.subjects().is_empty());
}

#[tokio::test]
#[serial]
async fn get_by_ids_skips_unknown_ids() {
    let repos = get_test_repositories().await;
    let s = repos
        .subjects
        .save(Subject::new("Poetry").unwrap())
        .await
        .unwrap();

    let found = repos
        .subjects
        .get_by_ids(&[EntityId::new(77), s.id().unwrap()])
        .await
        .unwrap();

    assert_eq!(found, vec![s]);
}

#[tokio::test]
#[serial]
async fn user_email_is_unique() {
    let repos = get_test_repositories().await;
    repos
        .users
        .save(user("ada@example.com", vec![]))
        .await
        .unwrap();

    let err = repos
        .users
        .save(user("ada@example.com", vec![]))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::UniqueViolation(c) if c == "app_user_email_key"));
}

#[tokio::test]
#[serial]
async fn user_roles_and_lookup_by_email() {
    let repos = get_test_repositories().await;
    repos
        .users
        .save(user("admin@example.com", vec![Role::Admin]))
        .await
        .unwrap();

    let loaded = repos
        .users
        .find_by_email("admin@example.com")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.stored_roles(), &[Role::Admin]);
    assert_eq!(loaded.roles(), vec![Role::Admin, Role::User]);
    assert!(repos.users.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn users_are_paginated_newest_first() {
    let repos = get_test_repositories().await;
    for email in ["a@example.com", "b@other.org", "c@example.com", "d_x@example.com"] {
        repos.users.save(user(email, vec![])).await.unwrap();
    }

    let page = repos
        .users
        .get_paginated(PageRequest::new(1, 2), Some("EXAMPLE"))
        .await
        .unwrap();
    let emails: Vec<&str> = page.items.iter().map(User::email).collect();
    assert_eq!(page.total, 3);
    assert_eq!(emails, vec!["d_x@example.com", "c@example.com"]);

    // Underscore is matched literally, not as a wildcard.
    let page = repos
        .users
        .get_paginated(PageRequest::default(), Some("d_x"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let everything = repos
        .users
        .get_paginated(PageRequest::new(2, 3), None)
        .await
        .unwrap();
    assert_eq!(everything.total, 4);
    assert_eq!(everything.items.len(), 1);
    assert_eq!(everything.items[0].email(), "a@example.com");
}

#[tokio::test]
#[serial]
async fn books_by_author_view() {
    let repos = get_test_repositories().await;
    let author = repos.authors.save(Author::new("Borges").unwrap()).await.unwrap();
    repos.authors.save(Author::new("Idle").unwrap()).await.unwrap();
    let subject = repos
        .subjects
        .save(Subject::new("Stories").unwrap())
        .await
        .unwrap();
    for title in ["Ficciones", "aleph notes", "El Aleph"] {
        repos
            .books
            .save(Book::new(details(title), vec![subject.clone()], vec![author.clone()]).unwrap())
            .await
            .unwrap();
    }

    let rows = repos.reports.books_by_author().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].book_titles.as_deref(), Some("El Aleph, Ficciones, aleph notes"));
    assert_eq!(rows[0].subjects.as_deref(), Some("Stories"));
    assert_eq!(rows[1].author_name, "Idle");
    assert_eq!(rows[1].book_titles, None);
}
