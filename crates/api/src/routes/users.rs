//! User endpoints.
//!
//! Responses are built from [`UserResponse`], which never carries the
//! password hash.

use std::fmt;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use common::{EntityId, PageRequest};
use domain::{CreateUser, DeleteUser, Role, UpdateUser, User, UserError};
use serde::{Deserialize, Serialize};

use super::{ApiJson, AppState, CreatedReply, Reply, created, ok, parse_id};
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListUsersQuery {
    /// Non-numeric values fall back to the defaults.
    fn page_request(&self) -> PageRequest {
        let number = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<i64>().ok())
        };
        PageRequest::from_query(number(&self.page), number(&self.limit))
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct UserRequest {
    pub email: String,
    pub roles: Vec<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRequest")
            .field("email", &self.email)
            .field("roles", &self.roles)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Option<EntityId>,
    pub email: String,
    pub roles: Vec<Role>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            roles: user.roles(),
            name: user.name().map(str::to_string),
            avatar: user.avatar().map(str::to_string),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub pagination: Pagination,
}

/// GET /api/users?page&limit&search
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Reply<UserListResponse> {
    let request = query.page_request();
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let page = state
        .repositories
        .users
        .get_paginated(request, search)
        .await?;

    let pagination = Pagination {
        page: request.page(),
        limit: request.limit(),
        total: page.total,
        pages: page.pages(request.limit()),
    };
    let users = page.items.iter().map(UserResponse::from).collect();

    Ok(ok(UserListResponse { users, pagination }))
}

/// GET /api/users/{id}
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Reply<UserResponse> {
    let id = parse_id(&id)?;
    state
        .repositories
        .users
        .get(id)
        .await?
        .map(|user| ok(UserResponse::from(&user)))
        .ok_or_else(|| ApiError::NotFound(UserError::NotFound(id).to_string()))
}

/// POST /api/users
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UserRequest>,
) -> CreatedReply {
    let id = state
        .bus
        .dispatch(CreateUser {
            email: req.email,
            roles: req.roles,
            name: req.name,
            avatar: req.avatar,
            password: req.password,
        })
        .await?;
    Ok(created(id, "User created successfully!"))
}

/// PUT /api/users/{id}
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UserRequest>,
) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state
        .bus
        .dispatch(UpdateUser {
            id,
            email: req.email,
            roles: req.roles,
            password: req.password,
            name: req.name,
            avatar: req.avatar,
        })
        .await?;
    Ok(ok("User updated successfully!"))
}

/// DELETE /api/users/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Reply<&'static str> {
    let id = parse_id(&id)?;
    state.bus.dispatch(DeleteUser { id }).await?;
    Ok(ok("User deleted successfully!"))
}
