//! Uniform result shape for calls to the auth API.
//!
//! Every call resolves to either `Success(data)` or `Failure(errors)`, where
//! the errors are a single message or field-keyed validation messages. The
//! API's error bodies come in several shapes; [`normalize_error_body`]
//! collapses them into one.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use tms_core::FieldErrors;

/// Errors reported by the auth API (or by the client on its behalf).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrors {
    /// A single message not tied to any field.
    Message(String),
    /// Validation messages keyed by request field.
    Fields(FieldErrors),
}

impl AuthErrors {
    /// Message for a non-2xx response whose body could not be interpreted.
    #[must_use]
    pub fn status_fallback(status: StatusCode) -> Self {
        Self::Message(format!("Request failed with status {}", status.as_u16()))
    }
}

impl fmt::Display for AuthErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Fields(fields) => {
                let mut first = true;
                for (field, messages) in fields.iter() {
                    if !first {
                        f.write_str("; ")?;
                    }
                    first = false;
                    write!(f, "{field}: {}", messages.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Outcome of an auth API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult<T> {
    /// The call succeeded with `T`.
    Success(T),
    /// The call failed; the errors are ready for display.
    Failure(AuthErrors),
}

impl<T> AuthResult<T> {
    /// Shorthand for a single-message failure.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Failure(AuthErrors::Message(message.into()))
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Chain a fallible step onto a successful result.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> AuthResult<U>) -> AuthResult<U> {
        match self {
            Self::Success(data) => f(data),
            Self::Failure(errors) => AuthResult::Failure(errors),
        }
    }
}

/// Normalize a non-2xx response body.
///
/// - `{"detail": "..."}` (and nothing else) becomes a message.
/// - Any other non-empty object becomes field errors with exactly the body's
///   keys.
/// - A JSON string becomes a message; an array of strings is joined.
/// - Anything else falls back to "Request failed with status N".
#[must_use]
pub fn normalize_error_body(status: StatusCode, body: &[u8]) -> AuthErrors {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return AuthErrors::status_fallback(status);
    };

    match value {
        Value::Object(map) if map.is_empty() => AuthErrors::status_fallback(status),
        Value::Object(map) => {
            if map.len() == 1
                && let Some(Value::String(detail)) = map.get("detail")
            {
                return AuthErrors::Message(detail.clone());
            }

            AuthErrors::Fields(
                map.into_iter()
                    .map(|(field, value)| (field, field_messages(value)))
                    .collect(),
            )
        }
        Value::String(message) if !message.is_empty() => AuthErrors::Message(message),
        Value::Array(items) if !items.is_empty() => {
            let messages: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            messages.map_or_else(
                || AuthErrors::status_fallback(status),
                |messages| AuthErrors::Message(messages.join("; ")),
            )
        }
        _ => AuthErrors::status_fallback(status),
    }
}

/// Messages for one field of an error object.
fn field_messages(value: Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message],
        Value::Array(items) => items.into_iter().map(json_text).collect(),
        other => vec![other.to_string()],
    }
}

fn json_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
