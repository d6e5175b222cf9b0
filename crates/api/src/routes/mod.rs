//! Route handlers and the pieces they share.

pub mod authors;
pub mod books;
pub mod categories;
pub mod health;
pub mod metrics;
pub mod reports;
pub mod subjects;
pub mod users;

use std::sync::Arc;

use axum::Json;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use common::EntityId;
use domain::{CommandBus, Repositories};
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
///
/// Writes go through the command bus; reads go straight to the repositories.
pub struct AppState {
    pub bus: Arc<CommandBus>,
    pub repositories: Repositories,
    /// Storage backend name reported by `/health`.
    pub storage: &'static str,
}

/// JSON body extractor whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// The `{"success": true, "data": ...}` envelope.
#[derive(Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
}

pub type Reply<T> = Result<Json<Success<T>>, ApiError>;

pub type CreatedReply = Result<(StatusCode, Json<Success<Created>>), ApiError>;

pub fn ok<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}

/// Body of a successful create: the new id and a confirmation.
#[derive(Serialize)]
pub struct Created {
    pub id: EntityId,
    pub message: &'static str,
}

pub fn created(id: EntityId, message: &'static str) -> (StatusCode, Json<Success<Created>>) {
    (StatusCode::CREATED, ok(Created { id, message }))
}

/// Parses an `{id}` path segment.
pub(crate) fn parse_id(raw: &str) -> Result<EntityId, ApiError> {
    Ok(raw.parse::<EntityId>()?)
}
