//! HTTP route handlers for the tasks app.
//!
//! | Method    | Path               | Handler            |
//! |-----------|--------------------|--------------------|
//! | GET       | `/`                | redirect to list   |
//! | GET       | `/tasks`           | [`tasks::index`]   |
//! | GET       | `/tasks/create`    | [`tasks::create`]  |
//! | POST      | `/tasks`           | [`tasks::store`]   |
//! | GET       | `/tasks/{id}`      | [`tasks::show`]    |
//! | GET       | `/tasks/{id}/edit` | [`tasks::edit`]    |
//! | PUT/PATCH | `/tasks/{id}`      | [`tasks::update`]  |
//! | DELETE    | `/tasks/{id}`      | [`tasks::destroy`] |

pub mod tasks;

use axum::{
    Router,
    http::Uri,
    response::Redirect,
    routing::get,
};

use crate::error::AppError;
use crate::state::AppState;

/// Build the page router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .nest("/tasks", task_routes())
        .fallback(not_found)
}

fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::index).post(tasks::store))
        .route("/create", get(tasks::create))
        .route(
            "/{id}",
            get(tasks::show)
                .put(tasks::update)
                .patch(tasks::update)
                .delete(tasks::destroy),
        )
        .route("/{id}/edit", get(tasks::edit))
}

async fn home() -> Redirect {
    Redirect::to(tasks::INDEX_PATH)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
