//! Orchard Tasks: a server-rendered task list with create, edit and delete.
//!
//! The crate is a library so the router can be built in tests and by the
//! integration test harness; `main.rs` only adds process setup.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod layout;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower::Layer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use middleware::{create_session_layer, csrf_middleware, method_override, request_id_middleware};
use state::AppState;

/// Build the full application router.
///
/// Pages run behind the session and CSRF layers; health probes do not, so
/// they never create sessions. The method override wraps the finished router
/// because the rewritten method must be visible to routing.
pub fn app<S>(state: AppState, store: S) -> Router
where
    S: SessionStore + Clone,
{
    let secure = state.config().secure_cookies();

    let pages = routes::routes()
        .layer(axum::middleware::from_fn(csrf_middleware))
        .layer(create_session_layer(store, secure));

    let router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(pages)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state);

    Router::new().fallback_service(axum::middleware::from_fn(method_override).layer(router))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Method, Response};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::TasksConfig;

    /// Router over a pool that never connects; only paths that stop before
    /// the database can be exercised here.
    fn test_app() -> Router {
        let config = TasksConfig::from_lookup(|key| match key {
            "TASKS_DATABASE_URL" => Some("postgres://localhost/orchard_unused".to_string()),
            "TASKS_BASE_URL" => Some("http://localhost:3000".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/orchard_unused")
            .unwrap();
        app(AppState::new(config, pool), MemoryStore::default())
    }

    async fn text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    /// Open the create form and return `(session cookie, csrf token)`.
    async fn session(app: &Router) -> (String, String) {
        let response = app.clone().oneshot(get("/tasks/create")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_owned();
        let html = text(response).await;
        let token = html
            .split("name=\"_token\" value=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap()
            .to_owned();
        (cookie, token)
    }

    fn form(method: Method, uri: &str, cookie: &str, body: String) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(COOKIE, cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_task_list() {
        let response = test_app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/tasks");
    }

    #[tokio::test]
    async fn test_health_skips_session() {
        let response = test_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response = test_app().oneshot(get("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_page_renders_in_layout() {
        let response = test_app().oneshot(get("/tasks/create")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());

        let html = text(response).await;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Create Task | Tasks</title>"));
        assert!(html.contains(">Create</button>"));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_404() {
        let app = test_app();
        let response = app.clone().oneshot(get("/tasks/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get("/tasks/abc/edit")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_without_token_is_page_expired() {
        let app = test_app();
        let (cookie, _) = session(&app).await;

        let response = app
            .oneshot(form(
                Method::POST,
                "/tasks",
                &cookie,
                "title=A&description=B".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), error::PAGE_EXPIRED);
    }

    #[tokio::test]
    async fn test_invalid_store_rerenders_form_with_errors() {
        let app = test_app();
        let (cookie, token) = session(&app).await;

        let response = app
            .oneshot(form(
                Method::POST,
                "/tasks",
                &cookie,
                format!("_token={token}&title=Keep+me&description=+"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = text(response).await;
        assert!(html.contains("The description field is required."));
        assert!(html.contains("value=\"Keep me\""));
    }

    #[tokio::test]
    async fn test_method_override_reaches_delete_route() {
        let app = test_app();
        let (cookie, token) = session(&app).await;

        // A bad id answers 404 from the DELETE handler; without the override
        // the POST would be refused by the router with 405.
        let response = app
            .oneshot(form(
                Method::POST,
                "/tasks/abc",
                &cookie,
                format!("_token={token}&_method=DELETE"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_plain_post_to_task_is_method_not_allowed() {
        let app = test_app();
        let (cookie, token) = session(&app).await;

        let response = app
            .oneshot(form(
                Method::POST,
                "/tasks/1",
                &cookie,
                format!("_token={token}"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
