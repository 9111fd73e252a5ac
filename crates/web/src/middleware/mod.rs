//! HTTP middleware stack for the web frontend.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame denial, etc.)
//! 5. Rate limiting (governor, `POST /signin` and `POST /signup` only)
//!
//! Sessions are not a layer: handlers read the `auth_token` cookie through
//! the [`RequireSession`] and [`OptionalSession`] extractors.

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{
    OptionalSession, RequireSession, SESSION_COOKIE_NAME, create_session, destroy_session,
    read_session,
};
