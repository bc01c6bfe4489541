//! HTTP middleware stack for the tasks app.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Method override (wraps the router; runs before routing)
//! 2. `TraceLayer` (request span)
//! 3. Request ID
//! 4. Session layer (tower-sessions)
//! 5. CSRF token issue/verification

pub mod csrf;
pub mod form;
pub mod method_override;
pub mod request_id;
pub mod session;

pub use csrf::{CsrfToken, csrf_middleware};
pub use method_override::method_override;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
