//! Account route handlers.
//!
//! Every handler here takes [`RequireSession`], so requests without a valid
//! session cookie are redirected to the sign-in page before reaching them.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::catalog::Course;
use crate::filters;
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub signed_in: bool,
    pub suggested: Vec<Course>,
}

/// Display the account overview.
pub async fn index(
    State(state): State<AppState>,
    RequireSession(_tokens): RequireSession,
) -> impl IntoResponse {
    AccountTemplate {
        signed_in: true,
        suggested: state.catalog().popular().to_vec(),
    }
}
