//! TMS web frontend library.
//!
//! Landing pages, the course catalog and the sign-in/sign-up forms that
//! front the external auth API. The binary in `main.rs` adds tracing,
//! Sentry and the listener; everything else is built by [`app`] so it can
//! be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// Build the application router with all routes and middleware applied.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(state.config()))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
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
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. The auth API is not contacted.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("No route".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, WebConfig};

    fn test_app() -> Router {
        let config = WebConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            api: ApiConfig::with_base_url("http://127.0.0.1:9").unwrap(),
            static_dir: "static".into(),
            log_json: false,
            trust_proxy_headers: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        app(AppState::new(config))
    }

    async fn get(uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_home_page() {
        let (status, headers, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Popular Courses"));
        assert!(body.contains("Python for Everyone"));
        assert!(body.contains("Sign in"));
        assert!(headers.contains_key("x-request-id"));
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    }

    #[tokio::test]
    async fn test_unknown_route_renders_404_page() {
        let (status, _, body) = get("/no-such-page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn test_catalog_search() {
        let (status, _, body) = get("/courses?q=python").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Data Analysis with Python"));
        assert!(!body.contains("Workplace Communication"));
    }

    #[tokio::test]
    async fn test_catalog_rejects_unknown_category() {
        let (status, _, _) = get("/courses?category=astrology").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_course_detail() {
        let (status, _, body) = get("/courses/1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Python for Everyone"));

        let (status, _, _) = get("/courses/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get("/courses/python").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_account_requires_session() {
        let (status, headers, _) = get("/account").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/signin");
    }

    #[tokio::test]
    async fn test_signin_registered_notice() {
        let (status, _, body) = get("/signin?registered=true").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Your account has been created"));

        let (_, _, body) = get("/signin").await;
        assert!(!body.contains("Your account has been created"));
    }

    #[tokio::test]
    async fn test_signin_validation_rerenders_form() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signin")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("email=learner%40example.com&password="))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Password is required"));
        assert!(body.contains("value=\"learner@example.com\""));
    }

    #[tokio::test]
    async fn test_signout_expires_cookie() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/signout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("auth_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
