//! Page chrome shared by catalog pages.

use askama::Template;
use askama_web::WebTemplate;

use crate::error::Result;
use crate::filters;

/// The document shell pages are rendered into.
#[derive(Template, WebTemplate)]
#[template(path = "layout.html")]
pub struct LayoutTemplate {
    pub title: String,
    /// Pre-rendered page fragment, inserted without escaping.
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
