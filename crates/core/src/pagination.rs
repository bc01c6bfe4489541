//! Offset pagination with a page-number slider.
//!
//! A [`Page`] carries one slice of a result set together with the metadata
//! needed to render navigation: the current page, the page size and the total
//! number of rows. Page numbers are 1-based.
//!
//! The numbered links follow a slider with three pages on each side of the
//! current one. Short result sets list every page; long ones collapse into
//! `first … window … last` with [`PageLink::Gap`] markers.

use serde::{Deserialize, Serialize};

/// Pages shown on each side of the current page in the slider.
pub const ON_EACH_SIDE: u64 = 3;

/// Default page size when none is configured.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// One slice of a paginated result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page (may be empty for out-of-range pages).
    pub items: Vec<T>,
    /// Requested page number, 1-based.
    pub current_page: u64,
    /// Page size.
    pub per_page: u64,
    /// Total number of rows across all pages.
    pub total: u64,
}

/// An entry in the rendered page-number list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// A numbered page; `active` marks the current one.
    Number { page: u64, active: bool },
    /// An elided run of pages (`...`).
    Gap,
}

/// Query-string parameters for paginated listings.
///
/// `page` is kept as a raw string so that garbage like `?page=abc` falls back
/// to the first page instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// The requested page number, clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> u64 {
        parse_page(self.page.as_deref())
    }
}

/// Parse a `page` parameter leniently.
///
/// Missing, non-numeric and zero values all resolve to page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Row offset for a page, saturating on overflow.
#[must_use]
pub const fn offset(page: u64, per_page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

impl<T> Page<T> {
    /// Create a page. `current_page` and `per_page` are clamped to at least 1.
    #[must_use]
    pub fn new(items: Vec<T>, current_page: u64, per_page: u64, total: u64) -> Self {
        Self {
            items,
            current_page: current_page.max(1),
            per_page: per_page.max(1),
            total,
        }
    }

    /// Number of the last page (1 for an empty result set).
    #[must_use]
    pub const fn last_page(&self) -> u64 {
        let pages = self.total.div_ceil(self.per_page);
        if pages == 0 { 1 } else { pages }
    }

    /// Whether there is more than one page to navigate.
    #[must_use]
    pub const fn has_pages(&self) -> bool {
        self.last_page() > 1
    }

    /// Whether the current page is the first page.
    #[must_use]
    pub const fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    /// Whether pages exist after the current one.
    #[must_use]
    pub const fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }

    /// The previous page number, if any.
    #[must_use]
    pub const fn previous_page(&self) -> Option<u64> {
        if self.on_first_page() {
            None
        } else {
            Some(self.current_page - 1)
        }
    }

    /// The next page number, if any.
    #[must_use]
    pub const fn next_page(&self) -> Option<u64> {
        if self.has_more_pages() {
            Some(self.current_page + 1)
        } else {
            None
        }
    }

    /// 1-based position of the first item on this page.
    #[must_use]
    pub fn first_item(&self) -> Option<u64> {
        if self.items.is_empty() {
            return None;
        }
        Some(offset(self.current_page, self.per_page) + 1)
    }

    /// 1-based position of the last item on this page.
    #[must_use]
    pub fn last_item(&self) -> Option<u64> {
        self.first_item()
            .map(|first| first + self.items.len() as u64 - 1)
    }

    /// Transform the items while keeping the pagination metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
        }
    }

    /// Page-number entries for the navigation bar.
    ///
    /// Empty when there is only one page.
    #[must_use]
    pub fn links(&self) -> Vec<PageLink> {
        if !self.has_pages() {
            return Vec::new();
        }

        let last = self.last_page();
        let current = self.current_page;
        let window = ON_EACH_SIDE + 4;

        if last < ON_EACH_SIDE * 2 + 8 {
            return self.numbers(1, last);
        }

        let mut links = Vec::new();
        if current <= window {
            links.extend(self.numbers(1, window + ON_EACH_SIDE));
            links.push(PageLink::Gap);
            links.extend(self.numbers(last - 1, last));
        } else if current > last - window {
            links.extend(self.numbers(1, 2));
            links.push(PageLink::Gap);
            links.extend(self.numbers(last - (window + ON_EACH_SIDE - 1), last));
        } else {
            links.extend(self.numbers(1, 2));
            links.push(PageLink::Gap);
            links.extend(self.numbers(current - ON_EACH_SIDE, current + ON_EACH_SIDE));
            links.push(PageLink::Gap);
            links.extend(self.numbers(last - 1, last));
        }
        links
    }

    fn numbers(&self, from: u64, to: u64) -> Vec<PageLink> {
        (from..=to)
            .map(|page| PageLink::Number {
                page,
                active: page == self.current_page,
            })
            .collect()
    }
}
