//! Report endpoints.

use std::sync::Arc;

use axum::extract::State;
use domain::BooksByAuthor;

use super::{AppState, Reply, ok};

/// GET /api/reports/books-by-author. One row per author, by author id.
#[tracing::instrument(skip(state))]
pub async fn books_by_author(State(state): State<Arc<AppState>>) -> Reply<Vec<BooksByAuthor>> {
    let rows = state.repositories.reports.books_by_author().await?;
    metrics::counter!("reports_generated_total", "report" => "books_by_author").increment(1);
    Ok(ok(rows))
}
