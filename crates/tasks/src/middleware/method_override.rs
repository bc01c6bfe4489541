//! HTML form method override.
//!
//! Browsers can only submit forms with GET or POST. A POST whose form body
//! contains `_method=PUT|PATCH|DELETE` (or that carries an
//! `X-HTTP-Method-Override` header) is rewritten to that method before
//! routing. This middleware must wrap the router itself, not be added with
//! `Router::layer`, since method dispatch happens inside the router.

use axum::extract::Request;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::form::{buffer_body, form_field, is_form};

/// Form field carrying the intended method.
pub const METHOD_FIELD: &str = "_method";

/// Header carrying the intended method for non-form clients.
pub const METHOD_HEADER: &str = "x-http-method-override";

/// Rewrite `POST` requests that ask for another method.
pub async fn method_override(request: Request, next: Next) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let from_header = request
        .headers()
        .get(METHOD_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let (mut request, requested) = match from_header {
        Some(method) => (request, Some(method)),
        None if is_form(&request) => match buffer_body(request).await {
            Ok((request, body)) => {
                let method = form_field(&body, METHOD_FIELD);
                (request, method)
            }
            Err(err) => return err.into_response(),
        },
        None => (request, None),
    };

    if let Some(method) = requested.as_deref().and_then(overridable) {
        tracing::debug!(%method, uri = %request.uri(), "Method override");
        *request.method_mut() = method;
    }

    next.run(request).await
}

/// Methods a POST may be turned into.
fn overridable(raw: &str) -> Option<Method> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::http::header::CONTENT_TYPE;
    use axum::routing::post;
    use axum::Router;
    use tower::{Layer, ServiceExt};

    use super::*;

    /// Echo the method the handler saw, plus the body it received.
    async fn echo(method: Method, body: String) -> String {
        format!("{method} {body}")
    }

    fn app() -> Router {
        let inner = Router::new().route("/tasks/{id}", post(echo).put(echo).delete(echo));
        Router::new().fallback_service(axum::middleware::from_fn(method_override).layer(inner))
    }

    async fn send(request: axum::http::Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn form_post(body: &'static str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri("/tasks/7")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_with_method_field_becomes_put() {
        let (status, body) = send(form_post("_method=PUT&title=A")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "PUT _method=PUT&title=A");
    }

    #[tokio::test]
    async fn test_lowercase_delete_is_accepted() {
        let (_, body) = send(form_post("_method=delete")).await;
        assert!(body.starts_with("DELETE "));
    }

    #[tokio::test]
    async fn test_plain_post_is_untouched() {
        let (_, body) = send(form_post("title=A")).await;
        assert_eq!(body, "POST title=A");
    }

    #[tokio::test]
    async fn test_unknown_method_is_ignored() {
        let (_, body) = send(form_post("_method=TRACE")).await;
        assert!(body.starts_with("POST "));
    }

    #[tokio::test]
    async fn test_header_override() {
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/tasks/7")
            .header(METHOD_HEADER, "DELETE")
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(request).await;
        assert_eq!(body, "DELETE ");
    }

    #[test]
    fn test_overridable() {
        assert_eq!(overridable(" put "), Some(Method::PUT));
        assert_eq!(overridable("PATCH"), Some(Method::PATCH));
        assert_eq!(overridable("GET"), None);
        assert_eq!(overridable("POST"), None);
    }
}
