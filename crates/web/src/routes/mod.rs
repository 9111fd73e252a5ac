//! HTTP route handlers for the TMS site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /courses                - Course catalog (?q=, ?category=)
//! GET  /courses/{id}           - Course detail
//!
//! # Auth
//! GET  /signin                 - Sign-in page (?registered=true shows a notice)
//! POST /signin                 - Sign-in action (rate limited)
//! GET  /signup                 - Sign-up page
//! POST /signup                 - Sign-up action (rate limited)
//! POST /signout                - Sign-out action
//!
//! # Account (requires session)
//! GET  /account                - Account overview
//! ```

pub mod account;
pub mod auth;
pub mod courses;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::WebConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
///
/// Only the form actions sit behind the rate limiter; the pages do not.
pub fn auth_routes(config: &WebConfig) -> Router<AppState> {
    let actions = Router::new()
        .route("/signin", post(auth::sign_in))
        .route("/signup", post(auth::sign_up))
        .layer(auth_rate_limiter(config.trust_proxy_headers));

    Router::new()
        .route("/signin", get(auth::sign_in_page))
        .route("/signup", get(auth::sign_up_page))
        .route("/signout", post(auth::sign_out))
        .merge(actions)
}

/// Create the catalog routes router.
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::index))
        .route("/{id}", get(courses::show))
}

/// Create all routes for the site.
pub fn routes(config: &WebConfig) -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/courses", course_routes())
        // Account (session required, enforced by the extractor)
        .route("/account", get(account::index))
        // Auth
        .merge(auth_routes(config))
}
