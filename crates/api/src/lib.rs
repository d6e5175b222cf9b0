//! HTTP API server with observability for the library catalog.
//!
//! Provides REST endpoints for authors, books, subjects, categories, users
//! and reports, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{Argon2PasswordEncoder, Repositories, Services, TracingMailer, build_command_bus};
use metrics_exporter_prometheus::PrometheusHandle;
use storage::InMemoryDatabase;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/api/authors",
            get(routes::authors::list).post(routes::authors::create),
        )
        .route(
            "/api/authors/{id}",
            get(routes::authors::show)
                .put(routes::authors::update)
                .delete(routes::authors::delete),
        )
        .route(
            "/api/subjects",
            get(routes::subjects::list).post(routes::subjects::create),
        )
        .route(
            "/api/subjects/{id}",
            get(routes::subjects::show)
                .put(routes::subjects::update)
                .delete(routes::subjects::delete),
        )
        .route(
            "/api/categories",
            get(routes::categories::list).post(routes::categories::create),
        )
        .route(
            "/api/categories/{id}",
            get(routes::categories::show)
                .put(routes::categories::update)
                .delete(routes::categories::delete),
        )
        .route(
            "/api/books",
            get(routes::books::list).post(routes::books::create),
        )
        .route(
            "/api/books/{id}",
            get(routes::books::show)
                .put(routes::books::update)
                .delete(routes::books::delete),
        )
        .route(
            "/api/users",
            get(routes::users::list).post(routes::users::create),
        )
        .route(
            "/api/users/{id}",
            get(routes::users::show)
                .put(routes::users::update)
                .delete(routes::users::delete),
        )
        .route(
            "/api/reports/books-by-author",
            get(routes::reports::books_by_author),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the command bus over the given repositories and services.
pub fn create_state(
    repositories: Repositories,
    services: &Services,
    storage: &'static str,
) -> Arc<AppState> {
    let bus = build_command_bus(&repositories, services);
    Arc::new(AppState {
        bus,
        repositories,
        storage,
    })
}

/// Services used when nothing else is configured: Argon2 hashing and a mailer
/// that only logs.
pub fn default_services() -> Services {
    Services {
        password_encoder: Arc::new(Argon2PasswordEncoder::default()),
        mailer: Arc::new(TracingMailer::default()),
    }
}

/// Creates application state over a fresh in-memory database.
pub fn create_in_memory_state(services: &Services) -> Arc<AppState> {
    create_state(InMemoryDatabase::new().repositories(), services, "memory")
}
