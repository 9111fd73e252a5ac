//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("Phone number is required")]
    Empty,
    /// The input contains characters other than digits and separators.
    #[error("Phone number can only contain digits, spaces, dashes, dots and parentheses")]
    InvalidCharacter,
    /// Too few or too many digits.
    #[error("Phone number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum number of digits.
        min: usize,
        /// Maximum number of digits.
        max: usize,
    },
}

/// A phone number normalized to an optional leading `+` followed by digits.
///
/// Separators (spaces, dashes, dots, parentheses) are accepted on input and
/// dropped. The digit count follows E.164 (at most 15).
///
/// ```
/// use tms_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+1 (555) 010-9999").unwrap();
/// assert_eq!(phone.as_str(), "+15550109999");
/// assert!(PhoneNumber::parse("call me").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse and normalize a `PhoneNumber` from user input.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneNumberError`] if the input is empty, contains letters
    /// or other symbols, or has the wrong number of digits.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        let (prefix, rest) = s
            .strip_prefix('+')
            .map_or(("", s), |rest| ("+", rest));

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return Err(PhoneNumberError::InvalidCharacter),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneNumberError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(format!("{prefix}{digits}")))
    }

    /// Returns the normalized phone number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
