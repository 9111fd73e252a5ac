//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::catalog::{Course, Feature, HERO_STATS, Stat, WHY_US};
use crate::filters;
use crate::middleware::OptionalSession;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub signed_in: bool,
    pub stats: &'static [Stat],
    pub courses: Vec<Course>,
    pub features: &'static [Feature],
}

/// Display the home page: hero, popular courses and why-us.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: OptionalSession) -> impl IntoResponse {
    HomeTemplate {
        signed_in: session.is_signed_in(),
        stats: &HERO_STATS,
        courses: state.catalog().popular().to_vec(),
        features: &WHY_US,
    }
}
