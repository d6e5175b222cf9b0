//! Subject endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use domain::{CreateSubject, DeleteSubject, Subject, SubjectError, UpdateSubject};
use serde::Deserialize;

use super::{ApiJson, AppState, CreatedReply, Reply, created, ok, parse_id};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SubjectRequest {
    #[serde(default)]
    pub description: String,
}

/// GET /api/subjects
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Reply<Vec<Subject>> {
    Ok(ok(state.repositories.subjects.get_all().await?))
}

/// GET /api/subjects/{id}
#[tracing::instrument(skip(state))]
pub async fn show(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<Subject> {
    let id = parse_id(&id)?;
    state
        .repositories
        .subjects
        .get(id)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound(SubjectError::NotFound(id).to_string()))
}

/// POST /api/subjects
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SubjectRequest>,
) -> CreatedReply {
    let id = state
        .bus
        .dispatch(CreateSubject {
            description: req.description,
        })
        .await?;
    Ok(created(id, "Subject created successfully!"))
}

/// PUT /api/subjects/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<SubjectRequest>,
) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state
        .bus
        .dispatch(UpdateSubject {
            id,
            description: req.description,
        })
        .await?;
    Ok(ok("Subject updated successfully!"))
}

/// DELETE /api/subjects/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state.bus.dispatch(DeleteSubject { id }).await?;
    Ok(ok("Subject deleted successfully!"))
}
