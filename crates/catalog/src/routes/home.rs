//! Paginated product listing.

use askama::Template;
use axum::extract::{Query, State};
use tracing::instrument;

use orchard_core::{Page, PageLink, PageQuery, ProductId};

use crate::assets::asset_url;
use crate::db::ProductRepository;
use crate::error::Result;
use crate::filters;
use crate::layout::{LayoutTemplate, render_page};
use crate::models::Product;
use crate::state::AppState;

/// A product as shown on the listing.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: ProductId,
    /// Creation date, `YYYY-MM-DD`.
    pub created: String,
    pub image_url: String,
    pub title: String,
    pub brand: String,
    /// Full description; the template shortens it.
    pub description: String,
}

impl ProductCard {
    /// Build a card, resolving the image against `asset_base`.
    #[must_use]
    pub fn new(product: Product, asset_base: &str) -> Self {
        Self {
            id: product.id,
            created: product.created_at.format("%Y-%m-%d").to_string(),
            image_url: asset_url(asset_base, &product.image),
            title: product.title,
            brand: product.brand,
            description: product.description,
        }
    }
}

/// One entry of the page-number list. Gaps have no URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationLink {
    pub label: String,
    pub url: Option<String>,
    pub active: bool,
}

/// Item numbers shown on the current page, 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRange {
    pub first: u64,
    pub last: u64,
}

/// Navigation data for the pagination partial.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub has_pages: bool,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
    pub links: Vec<PaginationLink>,
    pub range: Option<ItemRange>,
    pub total: u64,
}

fn page_url(page: u64) -> String {
    format!("/?page={page}")
}

impl Pagination {
    /// Navigation for `page`, linking to `/?page=N`.
    #[must_use]
    pub fn new<T>(page: &Page<T>) -> Self {
        let links = page
            .links()
            .into_iter()
            .map(|link| match link {
                PageLink::Number { page, active } => PaginationLink {
                    label: page.to_string(),
                    url: Some(page_url(page)),
                    active,
                },
                PageLink::Gap => PaginationLink {
                    label: "...".to_string(),
                    url: None,
                    active: false,
                },
            })
            .collect();

        let range = page
            .first_item()
            .zip(page.last_item())
            .map(|(first, last)| ItemRange { first, last });

        Self {
            has_pages: page.has_pages(),
            previous_url: page.previous_page().map(page_url),
            next_url: page.next_page().map(page_url),
            links,
            range,
            total: page.total,
        }
    }
}

/// Product listing fragment.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductCard>,
    pub pagination: Pagination,
}

impl HomeTemplate {
    /// Build the listing for one page of products.
    #[must_use]
    pub fn new(page: Page<Product>, asset_base: &str) -> Self {
        let pagination = Pagination::new(&page);
        let products = page
            .map(|product| ProductCard::new(product, asset_base))
            .items;
        Self {
            products,
            pagination,
        }
    }
}

/// Home page: the product listing, `?page=N` selects the page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<LayoutTemplate> {
    let config = state.config();
    let page = ProductRepository::new(state.pool())
        .paginate(query.page(), config.per_page)
        .await?;

    render_page("Products", &HomeTemplate::new(page, &config.asset_url))
}
