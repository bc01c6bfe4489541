//! Custom Askama template filters.

use std::fmt::Display;

use orchard_core::text::limit_words;

/// Longest description shown on a product card, in characters.
pub const EXCERPT_CHARS: usize = 100;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Shortens text to [`EXCERPT_CHARS`] on a word boundary, adding `...`.
///
/// Usage in templates: `{{ product.description|excerpt }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn excerpt(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(limit_words(&value.to_string(), EXCERPT_CHARS))
}
