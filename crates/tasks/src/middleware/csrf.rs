//! Anti-forgery tokens bound to the session.
//!
//! Every session gets a random token on its first request. Forms embed it in
//! a hidden `_token` field; scripts may send it in `X-CSRF-TOKEN` instead.
//! State-changing requests without a matching token are answered with 419.

use axum::{
    extract::{FromRequestParts, Request},
    http::{Method, request::Parts},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use rand::distr::Alphanumeric;
use tower_sessions::Session;

use super::form::{buffer_body, form_field, is_form};
use crate::error::AppError;

/// Session key under which the token is stored.
pub const CSRF_SESSION_KEY: &str = "_token";

/// Form field carrying the token.
pub const CSRF_FIELD: &str = "_token";

/// Header carrying the token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Token length in characters.
const TOKEN_LEN: usize = 40;

/// The current session's anti-forgery token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    /// Generate a new random alphanumeric token.
    #[must_use]
    pub fn generate() -> Self {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Get the token value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Extractor for the token placed in request extensions by [`csrf_middleware`].
impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!("CSRF token not found in request extensions - middleware may be misconfigured");
            Self(String::new())
        }))
    }
}

/// Ensure the session has a token and verify it on state-changing requests.
///
/// Must run inside the session layer.
///
/// # Errors
///
/// Returns `AppError::CsrfMismatch` when the presented token is missing or
/// wrong, and `AppError::Session` when the session store fails.
pub async fn csrf_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = if let Some(token) = session.get::<String>(CSRF_SESSION_KEY).await? {
        token
    } else {
        let token = CsrfToken::generate().0;
        session.insert(CSRF_SESSION_KEY, &token).await?;
        token
    };

    let mut request = if is_state_changing(request.method()) {
        let (request, presented) = presented_token(request).await?;
        let valid = presented.is_some_and(|p| constant_time_compare(&p, &token));
        if !valid {
            tracing::warn!(method = %request.method(), uri = %request.uri(), "CSRF token mismatch");
            return Err(AppError::CsrfMismatch);
        }
        request
    } else {
        request
    };

    request.extensions_mut().insert(CsrfToken(token));
    Ok(next.run(request).await)
}

fn is_state_changing(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Token sent with the request, from the header or the form body.
async fn presented_token(request: Request) -> Result<(Request, Option<String>), AppError> {
    if let Some(token) = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        let token = token.to_owned();
        return Ok((request, Some(token)));
    }

    if !is_form(&request) {
        return Ok((request, None));
    }

    let (request, body) = buffer_body(request).await?;
    let token = form_field(&body, CSRF_FIELD);
    Ok((request, token))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::middleware::create_session_layer;

    async fn show_token(token: CsrfToken) -> String {
        token.0
    }

    async fn accepted() -> &'static str {
        "stored"
    }

    fn app() -> Router {
        Router::new()
            .route("/form", get(show_token).post(accepted))
            .layer(axum::middleware::from_fn(csrf_middleware))
            .layer(create_session_layer(MemoryStore::default(), false))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Fetch the form once and return `(session cookie, token)`.
    async fn start_session(app: &Router) -> (String, String) {
        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/form")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_owned();
        (cookie, body_text(response).await)
    }

    fn post(cookie: &str, body: String) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri("/form")
            .header(COOKIE, cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_token_is_issued_on_first_get() {
        let app = app();
        let (_, token) = start_session(&app).await;
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_matching_form_token_is_accepted() {
        let app = app();
        let (cookie, token) = start_session(&app).await;

        let response = app
            .oneshot(post(&cookie, format!("_token={token}&title=A")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "stored");
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_with_419() {
        let app = app();
        let (cookie, _) = start_session(&app).await;

        let response = app
            .oneshot(post(&cookie, "title=A".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 419);
    }

    #[tokio::test]
    async fn test_wrong_token_is_rejected() {
        let app = app();
        let (cookie, token) = start_session(&app).await;
        let forged: String = token.chars().rev().collect();

        let response = app
            .oneshot(post(&cookie, format!("_token={forged}")))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 419);
    }

    #[tokio::test]
    async fn test_header_token_is_accepted() {
        let app = app();
        let (cookie, token) = start_session(&app).await;

        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/form")
            .header(COOKIE, &cookie)
            .header(CSRF_HEADER, &token)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_without_session_is_rejected() {
        let response = app()
            .oneshot(post("orchard_session=unknown", "_token=abc".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 419);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }
}
