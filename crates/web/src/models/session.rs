//! Session-related types.
//!
//! The session is a single `{access, refresh}` token pair issued by the
//! auth API and carried in one cookie as JSON.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a token pair cannot be built or read back.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("access token is empty")]
    EmptyAccess,
    #[error("refresh token is empty")]
    EmptyRefresh,
    #[error("session value is not a JSON object")]
    NotAnObject,
    #[error("session value is not a token pair: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Access and refresh tokens for a signed-in user.
///
/// Both tokens are guaranteed non-empty. `Debug` output is redacted.
#[derive(Clone)]
pub struct TokenPair {
    access: SecretString,
    refresh: SecretString,
}

/// Cookie wire shape. Field order matches what the value has always looked
/// like: `{"refresh":"…","access":"…"}`.
#[derive(Serialize, Deserialize)]
struct TokenPairWire<'a> {
    #[serde(borrow)]
    refresh: std::borrow::Cow<'a, str>,
    #[serde(borrow)]
    access: std::borrow::Cow<'a, str>,
}

impl TokenPair {
    /// Build a token pair, rejecting empty tokens.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyAccess` or `SessionError::EmptyRefresh`.
    pub fn new(
        refresh: impl Into<String>,
        access: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let refresh = refresh.into();
        let access = access.into();
        if access.is_empty() {
            return Err(SessionError::EmptyAccess);
        }
        if refresh.is_empty() {
            return Err(SessionError::EmptyRefresh);
        }
        Ok(Self {
            access: SecretString::from(access),
            refresh: SecretString::from(refresh),
        })
    }

    /// Read a token pair out of a JSON object such as the auth API's token
    /// response. Extra keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, or if either token is
    /// missing, not a string, or empty.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SessionError> {
        // Derived struct impls also accept sequences like `["r","a"]`.
        if !value.is_object() {
            return Err(SessionError::NotAnObject);
        }
        let wire = TokenPairWire::deserialize(value)?;
        Self::new(wire.refresh, wire.access)
    }

    /// Parse the session cookie value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object, lacks either
    /// token, or has an empty token.
    pub fn from_cookie_value(value: &str) -> Result<Self, SessionError> {
        let value: serde_json::Value = serde_json::from_str(value)?;
        Self::from_json(&value)
    }

    /// Serialize for the session cookie.
    #[must_use]
    pub fn to_cookie_value(&self) -> String {
        let wire = TokenPairWire {
            refresh: self.refresh.expose_secret().into(),
            access: self.access.expose_secret().into(),
        };
        // Serializing two strings into a JSON object cannot fail.
        serde_json::to_string(&wire).unwrap_or_default()
    }

    /// The access token.
    #[must_use]
    pub const fn access(&self) -> &SecretString {
        &self.access
    }

    /// The refresh token.
    #[must_use]
    pub const fn refresh(&self) -> &SecretString {
        &self.refresh
    }
}

impl PartialEq for TokenPair {
    fn eq(&self, other: &Self) -> bool {
        self.access.expose_secret() == other.access.expose_secret()
            && self.refresh.expose_secret() == other.refresh.expose_secret()
    }
}

impl Eq for TokenPair {}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of reading the session cookie.
///
/// Callers decide what a non-valid session means for them; protected pages
/// redirect to sign-in, public pages simply render the signed-out view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Cookie present and holds a usable token pair.
    Valid(TokenPair),
    /// No cookie, or an empty one (the state after sign-out).
    Missing,
    /// Cookie present but unreadable or missing a token.
    Malformed,
}

impl SessionStatus {
    /// Classify a raw cookie value.
    #[must_use]
    pub fn from_cookie_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") => Self::Missing,
            Some(raw) => TokenPair::from_cookie_value(raw).map_or_else(
                |e| {
                    tracing::debug!(error = %e, "Ignoring malformed session cookie");
                    Self::Malformed
                },
                Self::Valid,
            ),
        }
    }

    /// The token pair, if the session is valid.
    #[must_use]
    pub fn into_tokens(self) -> Option<TokenPair> {
        match self {
            Self::Valid(tokens) => Some(tokens),
            Self::Missing | Self::Malformed => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_tokens() {
        assert!(matches!(
            TokenPair::new("refresh", ""),
            Err(SessionError::EmptyAccess)
        ));
        assert!(matches!(
            TokenPair::new("", "access"),
            Err(SessionError::EmptyRefresh)
        ));
    }

    #[test]
    fn test_cookie_value_shape() {
        let tokens = TokenPair::new("r-1", "a-1").unwrap();
        assert_eq!(tokens.to_cookie_value(), r#"{"refresh":"r-1","access":"a-1"}"#);
    }

    #[test]
    fn test_cookie_value_round_trip() {
        let tokens = TokenPair::new("eyJ.refresh", "eyJ.access").unwrap();
        let parsed = TokenPair::from_cookie_value(&tokens.to_cookie_value()).unwrap();
        assert_eq!(parsed, tokens);
        assert_eq!(parsed.access().expose_secret(), "eyJ.access");
        assert_eq!(parsed.refresh().expose_secret(), "eyJ.refresh");
    }

    #[test]
    fn test_round_trip_preserves_escaped_characters() {
        let tokens = TokenPair::new("with \"quotes\"", "back\\slash").unwrap();
        let parsed = TokenPair::from_cookie_value(&tokens.to_cookie_value()).unwrap();
        assert_eq!(parsed, tokens);
    }

    #[test]
    fn test_from_json_ignores_extra_keys() {
        let body = serde_json::json!({ "access": "a", "refresh": "r", "user": { "id": 1 } });
        let tokens = TokenPair::from_json(&body).unwrap();
        assert_eq!(tokens.access().expose_secret(), "a");
    }

    #[test]
    fn test_from_json_requires_both_tokens() {
        assert!(TokenPair::from_json(&serde_json::json!({ "access": "a" })).is_err());
        assert!(TokenPair::from_json(&serde_json::json!({ "access": 1, "refresh": "r" })).is_err());
        assert!(matches!(
            TokenPair::from_json(&serde_json::json!(["r", "a"])),
            Err(SessionError::NotAnObject)
        ));
        assert!(matches!(
            TokenPair::from_json(&serde_json::json!("r")),
            Err(SessionError::NotAnObject)
        ));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(SessionStatus::from_cookie_value(None), SessionStatus::Missing);
        assert_eq!(SessionStatus::from_cookie_value(Some("")), SessionStatus::Missing);

        for raw in [
            "not json",
            "{}",
            "null",
            r#"{"access":"a"}"#,
            r#"{"refresh":"r"}"#,
            r#"{"access":"","refresh":"r"}"#,
            r#"{"access":"a","refresh":""}"#,
            r#"{"access":["a"],"refresh":"r"}"#,
            r#"["r","a"]"#,
            r#""str""#,
            r#"[{"access":"a","refresh":"r"}]"#,
            "42",
        ] {
            assert_eq!(
                SessionStatus::from_cookie_value(Some(raw)),
                SessionStatus::Malformed,
                "{raw}"
            );
        }

        let valid = SessionStatus::from_cookie_value(Some(r#"{"access":"a","refresh":"r"}"#));
        assert_eq!(valid.into_tokens(), Some(TokenPair::new("r", "a").unwrap()));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let tokens = TokenPair::new("refresh-secret", "access-secret").unwrap();
        let debug_output = format!("{tokens:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("access-secret"));
        assert!(!debug_output.contains("refresh-secret"));
    }
}
