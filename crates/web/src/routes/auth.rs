//! Authentication route handlers.
//!
//! Sign-in and sign-up forms post back to the same path. Each action
//! validates the form, calls the auth API once and either stores the issued
//! tokens in the session cookie and redirects, or re-renders the form with
//! errors.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::backend::AuthResult;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::forms::{FormErrors, PASSWORD_MIN_LENGTH, SignInForm, SignUpForm, SignUpValues};
use crate::middleware::{OptionalSession, create_session, destroy_session};
use crate::state::AppState;

/// Where a successful sign-in lands.
const AFTER_SIGN_IN: &str = "/";

/// Where a registration without issued tokens lands.
const AFTER_SIGN_UP_WITHOUT_SESSION: &str = "/signin?registered=true";

/// Inputs on the sign-in form; errors for any other key go in the banner.
const SIGN_IN_FIELDS: [&str; 2] = ["email", "password"];

/// Inputs on the sign-up form.
const SIGN_UP_FIELDS: [&str; 6] = [
    "first_name",
    "last_name",
    "email",
    "phone_number",
    "password",
    "confirm_password",
];

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the sign-in page.
#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    pub registered: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signin.html")]
pub struct SignInTemplate {
    pub signed_in: bool,
    pub email: String,
    pub errors: FormErrors,
    pub banner: Vec<String>,
    pub notice: Option<&'static str>,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignUpTemplate {
    pub signed_in: bool,
    pub values: SignUpValues,
    pub errors: FormErrors,
    pub banner: Vec<String>,
    pub password_min_length: usize,
}

impl SignInTemplate {
    fn new(signed_in: bool, email: String, errors: FormErrors) -> Self {
        let banner = errors.banner(&SIGN_IN_FIELDS);
        Self {
            signed_in,
            email,
            errors,
            banner,
            notice: None,
        }
    }
}

impl SignUpTemplate {
    fn new(signed_in: bool, values: SignUpValues, errors: FormErrors) -> Self {
        let banner = errors.banner(&SIGN_UP_FIELDS);
        Self {
            signed_in,
            values,
            errors,
            banner,
            password_min_length: PASSWORD_MIN_LENGTH,
        }
    }
}

// =============================================================================
// Sign-in Routes
// =============================================================================

/// Display the sign-in page.
pub async fn sign_in_page(
    session: OptionalSession,
    Query(query): Query<SignInQuery>,
) -> impl IntoResponse {
    let mut page = SignInTemplate::new(
        session.is_signed_in(),
        String::new(),
        FormErrors::none(),
    );
    if query.registered.as_deref() == Some("true") {
        page.notice = Some("Your account has been created. Sign in to continue.");
    }
    page
}

/// Handle sign-in form submission.
pub async fn sign_in(
    State(state): State<AppState>,
    session: OptionalSession,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    let signed_in = session.is_signed_in();

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(fields) => {
            let page = SignInTemplate::new(
                signed_in,
                form.email_value(),
                FormErrors::from_fields(fields),
            );
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.auth().sign_in(&credentials).await {
        AuthResult::Success(tokens) => {
            add_breadcrumb("auth", "Sign-in submitted", Some(&[("outcome", "success")]));
            tracing::info!("Sign-in succeeded");
            (create_session(jar, &tokens), Redirect::to(AFTER_SIGN_IN)).into_response()
        }
        AuthResult::Failure(errors) => {
            add_breadcrumb("auth", "Sign-in submitted", Some(&[("outcome", "rejected")]));
            tracing::info!(errors = %errors, "Sign-in rejected");
            let page = SignInTemplate::new(
                signed_in,
                form.email_value(),
                FormErrors::from_auth_errors(errors),
            );
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}

// =============================================================================
// Sign-up Routes
// =============================================================================

/// Display the sign-up page.
pub async fn sign_up_page(session: OptionalSession) -> impl IntoResponse {
    SignUpTemplate::new(
        session.is_signed_in(),
        SignUpValues::default(),
        FormErrors::none(),
    )
}

/// Handle sign-up form submission.
///
/// If the API signs the new user in straight away the session is created
/// here; otherwise the user is sent to sign in.
pub async fn sign_up(
    State(state): State<AppState>,
    session: OptionalSession,
    jar: CookieJar,
    Form(form): Form<SignUpForm>,
) -> Response {
    let signed_in = session.is_signed_in();

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(fields) => {
            let page =
                SignUpTemplate::new(signed_in, form.values(), FormErrors::from_fields(fields));
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.auth().sign_up(&credentials).await {
        AuthResult::Success(registration) => {
            add_breadcrumb("auth", "Sign-up submitted", Some(&[("outcome", "success")]));
            match registration.tokens {
                Some(tokens) => {
                    tracing::info!("Sign-up succeeded, session issued");
                    (create_session(jar, &tokens), Redirect::to(AFTER_SIGN_IN)).into_response()
                }
                None => {
                    tracing::info!("Sign-up succeeded, sign-in required");
                    Redirect::to(AFTER_SIGN_UP_WITHOUT_SESSION).into_response()
                }
            }
        }
        AuthResult::Failure(errors) => {
            add_breadcrumb("auth", "Sign-up submitted", Some(&[("outcome", "rejected")]));
            tracing::info!(errors = %errors, "Sign-up rejected");
            let page = SignUpTemplate::new(
                signed_in,
                form.values(),
                FormErrors::from_auth_errors(errors),
            );
            (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
        }
    }
}

// =============================================================================
// Sign-out Route
// =============================================================================

/// Handle sign-out.
///
/// Expires the session cookie. The tokens themselves are not revoked.
pub async fn sign_out(jar: CookieJar) -> Response {
    add_breadcrumb("auth", "Signed out", None);
    (destroy_session(jar), Redirect::to("/")).into_response()
}
