//! Book endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use common::EntityId;
use domain::{Book, BookDetails, BookError, CreateBook, DeleteBook, UpdateBook};
use serde::Deserialize;

use super::{ApiJson, AppState, CreatedReply, Reply, created, ok, parse_id};
use crate::error::ApiError;

/// Publish year as sent by clients: `"1969"` or `1969`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PublishYear {
    Text(String),
    Number(i64),
}

impl Default for PublishYear {
    fn default() -> Self {
        PublishYear::Text(String::new())
    }
}

impl From<PublishYear> for String {
    fn from(year: PublishYear) -> Self {
        match year {
            PublishYear::Text(text) => text,
            PublishYear::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookRequest {
    pub title: String,
    pub edition: i32,
    pub publish_year: PublishYear,
    /// Price in minor currency units.
    pub price: i64,
    pub publisher: String,
    pub subject_ids: Vec<EntityId>,
    pub author_ids: Vec<EntityId>,
}

impl BookRequest {
    fn into_parts(self) -> (BookDetails, Vec<EntityId>, Vec<EntityId>) {
        let details = BookDetails {
            title: self.title,
            edition: self.edition,
            publish_year: self.publish_year.into(),
            price: self.price,
            publisher: self.publisher,
        };
        (details, self.subject_ids, self.author_ids)
    }
}

/// GET /api/books
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Reply<Vec<Book>> {
    Ok(ok(state.repositories.books.get_all().await?))
}

/// GET /api/books/{id}
#[tracing::instrument(skip(state))]
pub async fn show(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<Book> {
    let id = parse_id(&id)?;
    state
        .repositories
        .books
        .get(id)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound(BookError::NotFound(id).to_string()))
}

/// POST /api/books
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BookRequest>,
) -> CreatedReply {
    let (details, subject_ids, author_ids) = req.into_parts();
    let id = state
        .bus
        .dispatch(CreateBook {
            details,
            subject_ids,
            author_ids,
        })
        .await?;
    Ok(created(id, "Book created successfully!"))
}

/// PUT /api/books/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    let (details, subject_ids, author_ids) = req.into_parts();
    state
        .bus
        .dispatch(UpdateBook {
            id,
            details,
            subject_ids,
            author_ids,
        })
        .await?;
    Ok(ok("Book updated successfully!"))
}

/// DELETE /api/books/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state.bus.dispatch(DeleteBook { id }).await?;
    Ok(ok("Book deleted successfully!"))
}
