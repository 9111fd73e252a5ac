//! Course catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tms_core::{CourseCategory, CourseId};
use tracing::instrument;

use crate::catalog::{Course, CourseQuery, TOPICS, Topic};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalSession;
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Catalog search parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl CatalogQuery {
    /// Resolve into a catalog query. An empty `category` means "all".
    fn parse(self) -> Result<CourseQuery> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(
                CourseCategory::from_code(code)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {code}")))?,
            ),
        };
        let text = self
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        Ok(CourseQuery { text, category })
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Option in the category select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub code: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn category_options(selected: Option<CourseCategory>) -> Vec<CategoryOption> {
    CourseCategory::ALL
        .iter()
        .map(|category| CategoryOption {
            code: category.code(),
            label: category.label(),
            selected: selected == Some(*category),
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "courses/index.html")]
pub struct CoursesIndexTemplate {
    pub signed_in: bool,
    pub query: String,
    pub categories: Vec<CategoryOption>,
    pub topics: &'static [Topic],
    pub courses: Vec<Course>,
}

/// Course detail template.
#[derive(Template, WebTemplate)]
#[template(path = "courses/show.html")]
pub struct CourseShowTemplate {
    pub signed_in: bool,
    pub course: Course,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the catalog, optionally filtered.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: OptionalSession,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let query = query.parse()?;
    let courses: Vec<Course> = state
        .catalog()
        .search(&query)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(results = courses.len(), "Catalog search");

    Ok(CoursesIndexTemplate {
        signed_in: session.is_signed_in(),
        query: query.text.unwrap_or_default(),
        categories: category_options(query.category),
        topics: &TOPICS,
        courses,
    })
}

/// Display a single course.
#[instrument(skip_all, fields(course_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    session: OptionalSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let course = id
        .parse::<CourseId>()
        .ok()
        .and_then(|id| state.catalog().get(id))
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Course {id}")))?;

    Ok(CourseShowTemplate {
        signed_in: session.is_signed_in(),
        course,
    })
}
