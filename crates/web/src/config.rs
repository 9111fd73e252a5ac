//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target a local development setup
//! with the auth API on port 8000.
//!
//! - `TMS_HOST` - Bind address (default: 127.0.0.1)
//! - `TMS_PORT` - Listen port (default: 3000)
//! - `TMS_API_BASE_URL` - Origin of the external auth API (default: <http://127.0.0.1:8000>)
//! - `TMS_API_SIGNIN_PATH` - Token endpoint (default: /api/auth/token/)
//! - `TMS_API_SIGNUP_PATH` - Registration endpoint (default: /api/auth/register/)
//! - `TMS_STATIC_DIR` - Static asset directory (default: crates/web/static)
//! - `TMS_LOG_JSON` - Emit JSON logs when `true` (default: false)
//! - `TMS_TRUST_PROXY_HEADERS` - Key rate limits on `X-Forwarded-For` and
//!   similar headers when `true`; only set this behind a proxy that
//!   overwrites them (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_SIGNIN_PATH: &str = "/api/auth/token/";
const DEFAULT_SIGNUP_PATH: &str = "/api/auth/register/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// External auth API configuration
    pub api: ApiConfig,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Trust client IP headers set by a reverse proxy
    pub trust_proxy_headers: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// External auth API configuration.
///
/// The endpoint paths are configuration rather than constants because the
/// backend has shipped them under different routes.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API origin, e.g. `http://127.0.0.1:8000`
    pub base_url: Url,
    /// Path of the token (sign-in) endpoint
    pub signin_path: String,
    /// Path of the registration (sign-up) endpoint
    pub signup_path: String,
}

impl ApiConfig {
    /// Build config for an API at `base_url` using the default endpoint paths.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("TMS_API_BASE_URL", base_url)?,
            signin_path: DEFAULT_SIGNIN_PATH.to_string(),
            signup_path: DEFAULT_SIGNUP_PATH.to_string(),
        })
    }

    /// Resolve an endpoint path against the API origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("TMS_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        Ok(Self {
            base_url: parse_base_url("TMS_API_BASE_URL", &base_url)?,
            signin_path: endpoint_path(lookup, "TMS_API_SIGNIN_PATH", DEFAULT_SIGNIN_PATH)?,
            signup_path: endpoint_path(lookup, "TMS_API_SIGNUP_PATH", DEFAULT_SIGNUP_PATH)?,
        })
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("TMS_HOST")
            .unwrap_or_else(|| "127.0.0.1".into())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TMS_HOST".to_string(), e.to_string()))?;
        let port = lookup("TMS_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TMS_PORT".to_string(), e.to_string()))?;
        let log_json = parse_flag(&lookup, "TMS_LOG_JSON")?;
        let trust_proxy_headers = parse_flag(&lookup, "TMS_TRUST_PROXY_HEADERS")?;

        Ok(Self {
            host,
            port,
            api: ApiConfig::from_lookup(&lookup)?,
            static_dir: lookup("TMS_STATIC_DIR")
                .map_or_else(|| PathBuf::from("crates/web/static"), PathBuf::from),
            log_json,
            trust_proxy_headers,
            sentry_dsn: lookup("SENTRY_DSN")
                .filter(|dsn| !dsn.is_empty())
                .map(SecretString::from),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    Ok(url)
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<bool, ConfigError> {
    match lookup(key).as_deref() {
        None | Some("" | "0" | "false") => Ok(false),
        Some("1" | "true") => Ok(true),
        Some(other) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true or false, got {other:?}"),
        )),
    }
}

fn endpoint_path(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    let path = lookup(key).unwrap_or_else(|| default.to_string());
    if !path.starts_with('/') {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must start with '/'".to_string(),
        ));
    }
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.api.base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.api.signin_path, "/api/auth/token/");
        assert_eq!(config.api.signup_path, "/api/auth/register/");
        assert!(!config.log_json);
        assert!(!config.trust_proxy_headers);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TMS_HOST", "0.0.0.0"),
            ("TMS_PORT", "8080"),
            ("TMS_API_BASE_URL", "https://api.example.com"),
            ("TMS_API_SIGNUP_PATH", "/api/users/users/"),
            ("TMS_LOG_JSON", "true"),
            ("TMS_TRUST_PROXY_HEADERS", "1"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.log_json);
        assert!(config.trust_proxy_headers);
        assert_eq!(
            config.api.endpoint(&config.api.signup_path).unwrap().as_str(),
            "https://api.example.com/api/users/users/"
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("TMS_PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TMS_PORT"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(load(&[("TMS_API_BASE_URL", "not a url")]).is_err());
        assert!(load(&[("TMS_API_BASE_URL", "ftp://files.example.com")]).is_err());
    }

    #[test]
    fn test_relative_endpoint_path_rejected() {
        let err = load(&[("TMS_API_SIGNIN_PATH", "api/auth/token/")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TMS_API_SIGNIN_PATH"));
    }

    #[test]
    fn test_invalid_flags() {
        assert!(load(&[("TMS_LOG_JSON", "maybe")]).is_err());
        let err = load(&[("TMS_TRUST_PROXY_HEADERS", "yes")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TMS_TRUST_PROXY_HEADERS")
        );
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let config = load(&[("SENTRY_DSN", "https://key@sentry.example.com/1")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("https://key@sentry.example.com/1"));
    }
}
