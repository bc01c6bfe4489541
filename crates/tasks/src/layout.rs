//! Shared page chrome.
//!
//! Page templates render only their own fragment; [`render_page`] places the
//! rendered fragment into `layout.html`.

use askama::Template;
use askama_web::WebTemplate;

use crate::error::Result;
use crate::filters;

/// The document shell every page is rendered into.
#[derive(Template, WebTemplate)]
#[template(path = "layout.html")]
pub struct LayoutTemplate {
    pub title: String,
    /// Pre-rendered, already escaped page fragment.
    pub content: String,
}

/// Render `fragment` and wrap it in the layout.
///
/// # Errors
///
/// Returns `AppError::Template` if either template fails to render.
pub fn render_page(title: impl Into<String>, fragment: &impl Template) -> Result<LayoutTemplate> {
    Ok(LayoutTemplate {
        title: title.into(),
        content: fragment.render()?,
    })
}
