//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Stylesheet served when the build found no main.css to fingerprint.
const UNHASHED_STYLESHEET: &str = "/static/css/main.css";

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the URL of the fingerprinted main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_href }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_href(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stylesheet_href(env!("CSS_HASH")))
}

/// Stylesheet URL for a build hash; an empty hash means nothing was copied
/// to `derived/`.
fn stylesheet_href(hash: &str) -> String {
    if hash.is_empty() {
        UNHASHED_STYLESHEET.to_string()
    } else {
        format!("/static/css/derived/main.{hash}.css")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_href_uses_hash() {
        assert_eq!(
            stylesheet_href("1a2b3c4d"),
            "/static/css/derived/main.1a2b3c4d.css"
        );
    }

    #[test]
    fn test_stylesheet_href_without_hash() {
        assert_eq!(stylesheet_href(""), "/static/css/main.css");
    }
}
