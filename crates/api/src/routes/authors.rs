//! Author endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use domain::{Author, AuthorError, CreateAuthor, DeleteAuthor, UpdateAuthor};
use serde::Deserialize;

use super::{ApiJson, AppState, CreatedReply, Reply, created, ok, parse_id};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AuthorRequest {
    #[serde(default)]
    pub name: String,
}

/// GET /api/authors
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Reply<Vec<Author>> {
    let authors = state.repositories.authors.get_all().await?;
    Ok(ok(authors))
}

/// GET /api/authors/{id}
#[tracing::instrument(skip(state))]
pub async fn show(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<Author> {
    let id = parse_id(&id)?;
    let author = state
        .repositories
        .authors
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(AuthorError::NotFound(id).to_string()))?;
    Ok(ok(author))
}

/// POST /api/authors
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AuthorRequest>,
) -> CreatedReply {
    let id = state.bus.dispatch(CreateAuthor { name: req.name }).await?;
    Ok(created(id, "Author created successfully!"))
}

/// PUT /api/authors/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AuthorRequest>,
) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state
        .bus
        .dispatch(UpdateAuthor { id, name: req.name })
        .await?;
    Ok(ok("Author updated successfully!"))
}

/// DELETE /api/authors/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state.bus.dispatch(DeleteAuthor { id }).await?;
    Ok(ok("Author deleted successfully!"))
}
