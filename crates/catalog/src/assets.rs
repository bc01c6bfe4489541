//! Static asset URL resolution.

/// Resolve `path` against the asset base URL.
///
/// The two parts are joined with exactly one `/`. Paths that are already
/// absolute URLs are returned unchanged.
#[must_use]
pub fn asset_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        return path.to_string();
    }

    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_with_single_slash() {
        assert_eq!(asset_url("/static", "product.png"), "/static/product.png");
        assert_eq!(asset_url("/static/", "/product.png"), "/static/product.png");
        assert_eq!(
            asset_url("https://cdn.example.com/assets/", "img/a.png"),
            "https://cdn.example.com/assets/img/a.png"
        );
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        assert_eq!(
            asset_url("/static", "https://images.example.com/p.png"),
            "https://images.example.com/p.png"
        );
        assert_eq!(asset_url("/static", "//cdn.example.com/p.png"), "//cdn.example.com/p.png");
    }
}
