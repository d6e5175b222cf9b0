//! Category endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use domain::{Category, CategoryError, CreateCategory, DeleteCategory, UpdateCategory};
use serde::Deserialize;

use super::{ApiJson, AppState, CreatedReply, Reply, created, ok, parse_id};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// GET /api/categories
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Reply<Vec<Category>> {
    Ok(ok(state.repositories.categories.get_all().await?))
}

/// GET /api/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn show(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<Category> {
    let id = parse_id(&id)?;
    state
        .repositories
        .categories
        .get(id)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound(CategoryError::NotFound(id).to_string()))
}

/// POST /api/categories
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> CreatedReply {
    let id = state
        .bus
        .dispatch(CreateCategory {
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok(created(id, "Category created successfully!"))
}

/// PUT /api/categories/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state
        .bus
        .dispatch(UpdateCategory {
            id,
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok(ok("Category updated successfully!"))
}

/// DELETE /api/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state.bus.dispatch(DeleteCategory { id }).await?;
    Ok(ok("Category deleted successfully!"))
}
