//! Integration test harness for the TMS web frontend.
//!
//! Each [`TestContext`] runs the full router on an ephemeral port, pointed
//! at a fresh `wiremock` server standing in for the auth API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tms-integration-tests
//! ```
//!
//! The session cookie is `Secure`, so the harness carries it by hand
//! instead of relying on a client cookie store over plain HTTP.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use reqwest::{Client, Response, header};
use tms_web::config::{ApiConfig, WebConfig};
use tms_web::middleware::SESSION_COOKIE_NAME;
use tms_web::state::AppState;
use tokio::task::JoinHandle;
use wiremock::MockServer;

/// Default sign-in endpoint on the mock API.
pub const SIGNIN_PATH: &str = "/api/auth/token/";

/// Default registration endpoint on the mock API.
pub const SIGNUP_PATH: &str = "/api/auth/register/";

/// A running site plus the mock auth API behind it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub api: MockServer,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start the mock API and the site.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let api = MockServer::start().await;

        let config = WebConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            api: ApiConfig::with_base_url(&api.uri()).expect("mock server URI is valid"),
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../web/static"),
            log_json: false,
            trust_proxy_headers: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let app = tms_web::app(AppState::new(config));

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        let server = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server error");
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            api,
            server,
        }
    }

    /// Absolute URL for a site path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a page, optionally sending a `name=value` cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.send().await.expect("GET request failed")
    }

    /// POST a urlencoded form, optionally sending a `name=value` cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> Response {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.send().await.expect("POST request failed")
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// The `auth_token` `Set-Cookie` header of a response, if any.
#[must_use]
pub fn set_session_cookie(response: &Response) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE_NAME}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(String::from)
}

/// The `name=value` pair of a `Set-Cookie` header, ready for a `Cookie` header.
#[must_use]
pub fn cookie_pair(set_cookie: &str) -> &str {
    set_cookie.split(';').next().unwrap_or(set_cookie).trim()
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// A complete, valid sign-up form.
#[must_use]
pub fn sign_up_form<'a>(email: &'a str, password: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("first_name", "Amani"),
        ("last_name", "Mushi"),
        ("email", email),
        ("phone_number", "+255 712 345 678"),
        ("password", password),
        ("confirm_password", password),
    ]
}
