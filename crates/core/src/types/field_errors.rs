//! Field-keyed validation messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Validation messages keyed by form field name.
///
/// Produced both by local form validation and by normalizing error bodies
/// returned from the auth API, so one display path can render either.
/// Keys are ordered so rendering and serialization are deterministic.
///
/// ```
/// use tms_core::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.add("email", "Email is required");
/// errors.add("email", "Email domain is invalid");
///
/// assert_eq!(errors.first("email"), Some("Email is required"));
/// assert_eq!(errors.first("password"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Append several messages for `field`. The key is recorded even when
    /// `messages` is empty.
    pub fn extend_field<I>(&mut self, field: impl Into<String>, messages: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.0
            .entry(field.into())
            .or_default()
            .extend(messages.into_iter().map(Into::into));
    }

    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Whether `field` has an entry.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over `(field, messages)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of fields with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        let mut errors = Self::new();
        for (field, messages) in iter {
            errors.extend_field(field, messages);
        }
        errors
    }
}
