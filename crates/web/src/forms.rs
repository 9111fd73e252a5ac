//! Sign-in and sign-up forms.
//!
//! Raw form posts are checked here before anything is sent to the auth API.
//! A form that fails validation never leaves the server; the same
//! [`FormErrors`] type carries local and API errors back to the template.

use secrecy::SecretString;
use serde::Deserialize;
use tms_core::{Email, FieldErrors, PhoneNumber};

use crate::backend::AuthErrors;

/// Minimum password length accepted on sign-up.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum length of first and last names.
pub const NAME_MAX_LENGTH: usize = 150;

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
///
/// Fields default to empty so a partial post validates instead of failing
/// to deserialize.
#[derive(Default, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sign-up form data.
#[derive(Default, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Validated sign-in credentials.
pub struct SignInCredentials {
    pub email: Email,
    pub password: SecretString,
}

/// Validated sign-up details.
pub struct SignUpCredentials {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: PhoneNumber,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Sign-up values echoed back into the form after a failed submission.
/// Passwords are never echoed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl SignInForm {
    /// Check the form and build credentials.
    ///
    /// # Errors
    ///
    /// Returns field errors for a missing or malformed email and a missing
    /// password.
    pub fn validate(&self) -> Result<SignInCredentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = Email::parse(&self.email)
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(SignInCredentials {
                email,
                password: SecretString::from(self.password.clone()),
            }),
            _ => Err(errors),
        }
    }

    /// The submitted email, trimmed, for redisplay.
    #[must_use]
    pub fn email_value(&self) -> String {
        self.email.trim().to_string()
    }
}

impl SignUpForm {
    /// Check the form and build sign-up details.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once so the whole form can be
    /// corrected in one pass.
    pub fn validate(&self) -> Result<SignUpCredentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = required_name(&mut errors, "first_name", "First name", &self.first_name);
        let last_name = required_name(&mut errors, "last_name", "Last name", &self.last_name);

        let email = Email::parse(&self.email)
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();

        let phone_number = PhoneNumber::parse(&self.phone_number)
            .map_err(|e| errors.add("phone_number", e.to_string()))
            .ok();

        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.chars().count() < PASSWORD_MIN_LENGTH {
            errors.add(
                "password",
                format!("Password must be at least {PASSWORD_MIN_LENGTH} characters"),
            );
        }

        if self.confirm_password.is_empty() {
            errors.add("confirm_password", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match");
        }

        match (first_name, last_name, email, phone_number) {
            (Some(first_name), Some(last_name), Some(email), Some(phone_number))
                if errors.is_empty() =>
            {
                Ok(SignUpCredentials {
                    email,
                    first_name,
                    last_name,
                    phone_number,
                    password: SecretString::from(self.password.clone()),
                    confirm_password: SecretString::from(self.confirm_password.clone()),
                })
            }
            _ => Err(errors),
        }
    }

    /// The submitted non-secret values, trimmed, for redisplay.
    #[must_use]
    pub fn values(&self) -> SignUpValues {
        SignUpValues {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
        }
    }
}

fn required_name(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{label} is required"));
        None
    } else if value.chars().count() > NAME_MAX_LENGTH {
        errors.add(
            field,
            format!("{label} must be at most {NAME_MAX_LENGTH} characters"),
        );
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Error Display
// =============================================================================

/// Errors shown on a form: per-field messages plus a form-level banner.
///
/// A flat API message is stored under the `form` key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(FieldErrors);

impl FormErrors {
    /// Key holding messages that belong to the whole form.
    pub const FORM_KEY: &'static str = "form";

    /// No errors.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Wrap field errors from local validation.
    #[must_use]
    pub const fn from_fields(fields: FieldErrors) -> Self {
        Self(fields)
    }

    /// Convert API errors for display.
    #[must_use]
    pub fn from_auth_errors(errors: AuthErrors) -> Self {
        match errors {
            AuthErrors::Message(message) => {
                let mut fields = FieldErrors::new();
                fields.add(Self::FORM_KEY, message);
                Self(fields)
            }
            AuthErrors::Fields(fields) => Self(fields),
        }
    }

    /// First message for `field`.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.0.first(field)
    }

    /// Banner messages: the form-level message followed by the first message
    /// of every key that has no input of its own on the form.
    #[must_use]
    pub fn banner(&self, form_fields: &[&str]) -> Vec<String> {
        let mut messages: Vec<String> = self
            .0
            .first(Self::FORM_KEY)
            .map(String::from)
            .into_iter()
            .collect();

        for (field, field_messages) in self.0.iter() {
            if field == Self::FORM_KEY || form_fields.contains(&field) {
                continue;
            }
            if let Some(message) = field_messages.first() {
                messages.push(message.clone());
            }
        }

        messages
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn valid_signup() -> SignUpForm {
        SignUpForm {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone_number: "+44 20 7946 0958".into(),
            password: "analytical-engine".into(),
            confirm_password: "analytical-engine".into(),
        }
    }

    #[test]
    fn test_signin_valid() {
        let form = SignInForm {
            email: " student@example.com ".into(),
            password: "hunter22".into(),
        };
        let credentials = form.validate().unwrap();
        assert_eq!(credentials.email.as_str(), "student@example.com");
        assert_eq!(credentials.password.expose_secret(), "hunter22");
    }

    #[test]
    fn test_signin_reports_each_missing_field() {
        let errors = SignInForm::default().validate().err().unwrap();
        assert_eq!(errors.first("email"), Some("Email is required"));
        assert_eq!(errors.first("password"), Some("Password is required"));
    }

    #[test]
    fn test_signin_bad_email_shape() {
        let form = SignInForm {
            email: "student-at-example.com".into(),
            password: "x".into(),
        };
        let errors = form.validate().err().unwrap();
        assert_eq!(errors.keys().collect::<Vec<_>>(), ["email"]);
    }

    #[test]
    fn test_signup_valid_trims_names() {
        let credentials = valid_signup().validate().unwrap();
        assert_eq!(credentials.first_name, "Ada");
        assert_eq!(credentials.phone_number.as_str(), "+442079460958");
        assert_eq!(credentials.confirm_password.expose_secret(), "analytical-engine");
    }

    #[test]
    fn test_signup_password_rules() {
        let mut form = valid_signup();
        form.password = "short".into();
        form.confirm_password = "short".into();
        let errors = form.validate().err().unwrap();
        assert_eq!(
            errors.first("password"),
            Some("Password must be at least 8 characters")
        );
        assert!(!errors.contains("confirm_password"));

        let mut form = valid_signup();
        form.confirm_password = "analytical-engin3".into();
        let errors = form.validate().err().unwrap();
        assert_eq!(errors.keys().collect::<Vec<_>>(), ["confirm_password"]);
        assert_eq!(errors.first("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn test_signup_collects_all_errors() {
        let errors = SignUpForm::default().validate().err().unwrap();
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            [
                "confirm_password",
                "email",
                "first_name",
                "last_name",
                "password",
                "phone_number"
            ]
        );
    }

    #[test]
    fn test_signup_name_too_long() {
        let mut form = valid_signup();
        form.last_name = "x".repeat(NAME_MAX_LENGTH + 1);
        let errors = form.validate().err().unwrap();
        assert_eq!(
            errors.first("last_name"),
            Some("Last name must be at most 150 characters")
        );
    }

    #[test]
    fn test_values_never_include_passwords() {
        let values = valid_signup().values();
        assert_eq!(values.first_name, "Ada");
        assert_eq!(values.phone_number, "+44 20 7946 0958");
    }

    #[test]
    fn test_form_errors_from_message() {
        let errors = FormErrors::from_auth_errors(AuthErrors::Message("Invalid credentials".into()));
        assert_eq!(errors.field(FormErrors::FORM_KEY), Some("Invalid credentials"));
        assert_eq!(errors.banner(&["email", "password"]), ["Invalid credentials"]);
    }

    #[test]
    fn test_form_errors_banner_collects_unknown_keys() {
        let mut fields = FieldErrors::new();
        fields.add("email", "user with this email already exists.");
        fields.add("non_field_errors", "Registration is closed.");
        let errors = FormErrors::from_auth_errors(AuthErrors::Fields(fields));

        assert_eq!(
            errors.field("email"),
            Some("user with this email already exists.")
        );
        assert_eq!(
            errors.banner(&["email", "password"]),
            ["Registration is closed."]
        );
        assert!(FormErrors::none().is_empty());
    }
}
