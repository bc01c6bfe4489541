//! HTTP route handlers for the catalog.

pub mod home;

use axum::{Router, http::Uri, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Build the page router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(home::home)).fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
