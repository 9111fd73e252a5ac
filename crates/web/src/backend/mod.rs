//! Client for the external auth API.
//!
//! Each operation issues exactly one `POST` with a JSON body and resolves to
//! an [`AuthResult`]. Transport failures are logged and reported as a generic
//! message; they never propagate as errors.
//!
//! ```text
//! POST {base}{signin_path}   {email, password}                      -> {refresh, access}
//! POST {base}{signup_path}   {email, first_name, last_name,
//!                             phone_number, password, confirm_password}
//!                                                                   -> {user, tokens: {refresh, access}}
//! ```

mod result;

pub use result::{AuthErrors, AuthResult, normalize_error_body};

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::instrument;

use crate::config::ApiConfig;
use crate::forms::{SignInCredentials, SignUpCredentials};
use crate::models::TokenPair;

/// Message shown when the auth API cannot be reached.
pub const NETWORK_ERROR_MESSAGE: &str =
    "We couldn't reach the sign-in service. Please check your connection and try again.";

/// Message shown when the API accepts a sign-in but returns no usable tokens.
pub const MISSING_TOKENS_MESSAGE: &str = "Sign-in succeeded but no session was issued.";

/// A completed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The API's response body.
    pub body: Value,
    /// Tokens, when the API signs the new user in immediately.
    pub tokens: Option<TokenPair>,
}

// =============================================================================
// AuthClient
// =============================================================================

/// Client for the auth API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    api: ApiConfig,
}

impl AuthClient {
    /// Create a new auth API client.
    #[must_use]
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                api: api.clone(),
            }),
        }
    }

    /// Post a JSON body to `path` on the API.
    ///
    /// - 2xx: `Success` with the parsed body (`null` when empty).
    /// - Non-2xx: `Failure` with the normalized error body.
    /// - Unreachable API or unreadable body: `Failure` with
    ///   [`NETWORK_ERROR_MESSAGE`].
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_json(&self, path: &str, body: &Value) -> AuthResult<Value> {
        let url = match self.inner.api.endpoint(path) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(error = %e, "Invalid auth API endpoint");
                return AuthResult::message(NETWORK_ERROR_MESSAGE);
            }
        };

        let response = match self.inner.client.post(url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Auth API request failed");
                return AuthResult::message(NETWORK_ERROR_MESSAGE);
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, status = %status, "Failed to read auth API response");
                return AuthResult::message(NETWORK_ERROR_MESSAGE);
            }
        };

        if !status.is_success() {
            let errors = normalize_error_body(status, &bytes);
            tracing::debug!(status = %status, "Auth API rejected request");
            return AuthResult::Failure(errors);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return AuthResult::Success(Value::Null);
        }

        match serde_json::from_slice(&bytes) {
            Ok(data) => AuthResult::Success(data),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    status = %status,
                    body = %String::from_utf8_lossy(&bytes).chars().take(200).collect::<String>(),
                    "Auth API returned a non-JSON success body"
                );
                AuthResult::Failure(AuthErrors::status_fallback(status))
            }
        }
    }

    /// Exchange email and password for a token pair.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, credentials: &SignInCredentials) -> AuthResult<TokenPair> {
        let body = json!({
            "email": credentials.email.as_str(),
            "password": credentials.password.expose_secret(),
        });

        self.post_json(&self.inner.api.signin_path, &body)
            .await
            .and_then(|data| match TokenPair::from_json(&data) {
                Ok(tokens) => AuthResult::Success(tokens),
                Err(e) => {
                    tracing::warn!(error = %e, "Sign-in response has no usable tokens");
                    AuthResult::message(MISSING_TOKENS_MESSAGE)
                }
            })
    }

    /// Register a new user.
    ///
    /// Tokens are picked up from a `tokens` object in the response when
    /// present; a registration without them is still a success.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, credentials: &SignUpCredentials) -> AuthResult<Registration> {
        let body = json!({
            "email": credentials.email.as_str(),
            "first_name": credentials.first_name,
            "last_name": credentials.last_name,
            "phone_number": credentials.phone_number.as_str(),
            "password": credentials.password.expose_secret(),
            "confirm_password": credentials.confirm_password.expose_secret(),
        });

        self.post_json(&self.inner.api.signup_path, &body)
            .await
            .and_then(|body| {
                let tokens = body
                    .get("tokens")
                    .and_then(|tokens| TokenPair::from_json(tokens).ok());
                AuthResult::Success(Registration { body, tokens })
            })
    }
}
