//! Helpers for peeking at url-encoded form bodies inside middleware.
//!
//! The body is buffered once and put back into the request, so handlers
//! downstream still see the full submission.

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};

use crate::error::AppError;

/// Largest form body the middleware will buffer.
pub const MAX_FORM_BYTES: usize = 64 * 1024;

/// Whether the request carries an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/x-www-form-urlencoded")
        })
}

/// Read the whole body and return it alongside a rebuilt request.
///
/// # Errors
///
/// Returns `AppError::PayloadTooLarge` when the declared length exceeds
/// [`MAX_FORM_BYTES`] and `AppError::BadRequest` when the body cannot be read.
pub async fn buffer_body(request: Request) -> Result<(Request, Bytes), AppError> {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > MAX_FORM_BYTES) {
        return Err(AppError::PayloadTooLarge);
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("unreadable request body: {e}")))?;

    Ok((Request::from_parts(parts, Body::from(bytes.clone())), bytes))
}

/// First value of `name` in a url-encoded body.
#[must_use]
pub fn form_field(body: &[u8], name: &str) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_decodes_values() {
        let body = b"_token=abc%2B1&title=Buy+milk&title=ignored";
        assert_eq!(form_field(body, "_token").as_deref(), Some("abc+1"));
        assert_eq!(form_field(body, "title").as_deref(), Some("Buy milk"));
        assert_eq!(form_field(body, "_method"), None);
    }

    #[test]
    fn test_is_form() {
        let form = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=UTF-8")
            .body(Body::empty())
            .unwrap();
        let json = axum::http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap();

        assert!(is_form(&form));
        assert!(!is_form(&json));
    }

    #[tokio::test]
    async fn test_buffer_body_keeps_request_readable() {
        let request = axum::http::Request::builder()
            .body(Body::from("title=A&description=B"))
            .unwrap();

        let (request, bytes) = buffer_body(request).await.unwrap();
        assert_eq!(&bytes[..], b"title=A&description=B");

        let again = axum::body::to_bytes(request.into_body(), MAX_FORM_BYTES)
            .await
            .unwrap();
        assert_eq!(again, bytes);
    }

    #[tokio::test]
    async fn test_buffer_body_rejects_declared_oversize() {
        let request = axum::http::Request::builder()
            .header(CONTENT_LENGTH, (MAX_FORM_BYTES + 1).to_string())
            .body(Body::empty())
            .unwrap();

        assert!(matches!(
            buffer_body(request).await,
            Err(AppError::PayloadTooLarge)
        ));
    }
}
