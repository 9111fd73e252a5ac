//! Cookie-backed session store and extractors.
//!
//! The session is the `auth_token` cookie holding the token pair as JSON.
//! There is no server-side session state.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::{SessionStatus, TokenPair};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// Session lifetime (7 days).
pub const SESSION_MAX_AGE: time::Duration = time::Duration::days(7);

/// Where unauthenticated requests for protected pages are sent.
pub const SIGN_IN_PATH: &str = "/signin";

/// Build the session cookie with its fixed attributes.
fn session_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}

/// Store `tokens` in the session cookie.
#[must_use]
pub fn create_session(jar: CookieJar, tokens: &TokenPair) -> CookieJar {
    jar.add(session_cookie(tokens.to_cookie_value(), SESSION_MAX_AGE))
}

/// Read the session cookie.
#[must_use]
pub fn read_session(jar: &CookieJar) -> SessionStatus {
    SessionStatus::from_cookie_value(jar.get(SESSION_COOKIE_NAME).map(Cookie::value))
}

/// Overwrite the session cookie with an empty, already-expired one.
#[must_use]
pub fn destroy_session(jar: CookieJar) -> CookieJar {
    jar.add(session_cookie(String::new(), time::Duration::ZERO))
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor that requires a valid session.
///
/// If the session is missing or malformed, the request is redirected to the
/// sign-in page. A malformed cookie is cleared on the way.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireSession(tokens): RequireSession) -> impl IntoResponse {
///     // tokens.access() is available here
/// }
/// ```
pub struct RequireSession(pub TokenPair);

/// Rejection returned when a valid session is required but absent.
pub enum SessionRejection {
    /// No session cookie.
    Missing,
    /// A session cookie that does not hold a token pair.
    Malformed,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let redirect = Redirect::to(SIGN_IN_PATH);
        match self {
            Self::Missing => redirect.into_response(),
            Self::Malformed => (destroy_session(CookieJar::new()), redirect).into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        match read_session(&jar) {
            SessionStatus::Valid(tokens) => Ok(Self(tokens)),
            SessionStatus::Missing => Err(SessionRejection::Missing),
            SessionStatus::Malformed => {
                tracing::debug!(path = %parts.uri.path(), "Malformed session cookie, redirecting to sign-in");
                Err(SessionRejection::Malformed)
            }
        }
    }
}

/// Extractor that optionally gets the session.
///
/// Unlike `RequireSession`, this never rejects; a malformed cookie reads as
/// no session.
pub struct OptionalSession(pub Option<TokenPair>);

impl OptionalSession {
    /// Whether the visitor is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.0.is_some()
    }
}

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(read_session(&jar).into_tokens()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, StatusCode, header};

    use super::*;

    fn tokens() -> TokenPair {
        TokenPair::new("refresh-1", "access-1").unwrap()
    }

    /// Replay the cookies a jar would set as the `Cookie` header of the next
    /// request.
    fn next_request_jar(jar: &CookieJar) -> CookieJar {
        let cookie_header = jar
            .iter()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect::<Vec<_>>()
            .join("; ");
        let mut headers = HeaderMap::new();
        if !cookie_header.is_empty() {
            headers.insert(header::COOKIE, HeaderValue::from_str(&cookie_header).unwrap());
        }
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn test_create_then_read_round_trips() {
        let jar = create_session(CookieJar::new(), &tokens());
        let status = read_session(&next_request_jar(&jar));
        assert_eq!(status, SessionStatus::Valid(tokens()));
    }

    #[test]
    fn test_cookie_attributes() {
        let jar = create_session(CookieJar::new(), &tokens());
        let cookie = jar.get(SESSION_COOKIE_NAME).unwrap();

        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert_eq!(cookie.value(), r#"{"refresh":"refresh-1","access":"access-1"}"#);
    }

    #[test]
    fn test_destroy_matches_never_created() {
        let jar = destroy_session(create_session(CookieJar::new(), &tokens()));
        let cookie = jar.get(SESSION_COOKIE_NAME).unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));

        assert_eq!(read_session(&next_request_jar(&jar)), SessionStatus::Missing);
        assert_eq!(read_session(&CookieJar::new()), SessionStatus::Missing);
    }

    #[test]
    fn test_malformed_cookie_reads_as_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=garbage"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(read_session(&jar), SessionStatus::Malformed);
    }

    #[test]
    fn test_rejections_redirect_to_sign_in() {
        for rejection in [SessionRejection::Missing, SessionRejection::Malformed] {
            let response = rejection.into_response();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[header::LOCATION], SIGN_IN_PATH);
        }
    }

    #[test]
    fn test_malformed_rejection_clears_cookie() {
        let response = SessionRejection::Malformed.into_response();
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("auth_token=;"));
        assert!(set_cookie.contains("Max-Age=0"));

        let response = SessionRejection::Missing.into_response();
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_extractors() {
        let request = axum::http::Request::builder()
            .uri("/account")
            .header(header::COOKIE, r#"auth_token={"refresh":"r","access":"a"}"#)
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();

        let RequireSession(required) = RequireSession::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(required, TokenPair::new("r", "a").unwrap());

        let optional = OptionalSession::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(optional.is_signed_in());
    }

    #[tokio::test]
    async fn test_non_object_cookie_redirects_and_clears() {
        // `["r","a"]` percent-encoded
        let request = axum::http::Request::builder()
            .uri("/account")
            .header(header::COOKIE, "auth_token=%5B%22r%22%2C%22a%22%5D")
            .body(())
            .unwrap();
        let (mut parts, ()) = request.into_parts();

        let rejection = RequireSession::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], SIGN_IN_PATH);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("auth_token=;"));
        assert!(set_cookie.contains("Max-Age=0"));

        let optional = OptionalSession::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(!optional.is_signed_in());
    }
}
