//! Session middleware configuration.
//!
//! Sessions only carry the anti-forgery token, so any `SessionStore` works;
//! the binary uses the `PostgreSQL` store and tests use the in-memory one.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "orchard_session";

/// Session lifetime after the last request, in seconds (2 hours).
const SESSION_IDLE_SECONDS: i64 = 2 * 60 * 60;

/// Create the session layer over `store`.
///
/// `secure` marks the cookie `Secure`; enable it when served over HTTPS.
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    secure: bool,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_IDLE_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
