//! Test harness for end-to-end tests of the Orchard apps.
//!
//! Servers run in-process on `127.0.0.1:0`; requests go through `reqwest`
//! with a cookie store so session-bound CSRF tokens work as in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! TEST_DATABASE_URL=postgres://localhost/orchard_test \
//!     cargo test -p orchard-integration-tests -- --ignored
//! ```

use axum::Router;
use reqwest::Client;
use reqwest::redirect::Policy;
use sqlx::PgPool;
use tokio::sync::OnceCell;

/// Environment variable naming the scratch database.
pub const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection string of the scratch database.
///
/// # Panics
///
/// Panics if `TEST_DATABASE_URL` is not set.
#[must_use]
pub fn database_url() -> String {
    std::env::var(TEST_DATABASE_URL)
        .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL} must be set for integration tests"))
}

/// Connect to the scratch database, applying both apps' migrations once per
/// test binary.
///
/// # Panics
///
/// Panics if the database is unreachable or a migration fails.
pub async fn test_pool() -> PgPool {
    let pool = PgPool::connect(&database_url())
        .await
        .unwrap_or_else(|e| panic!("failed to connect to test database: {e}"));

    MIGRATED
        .get_or_init(|| async {
            let mut tasks = sqlx::migrate!("../tasks/migrations");
            tasks
                .set_ignore_missing(true)
                .run(&pool)
                .await
                .unwrap_or_else(|e| panic!("tasks migrations failed: {e}"));

            let mut catalog = sqlx::migrate!("../catalog/migrations");
            catalog
                .set_ignore_missing(true)
                .run(&pool)
                .await
                .unwrap_or_else(|e| panic!("catalog migrations failed: {e}"));
        })
        .await;

    pool
}

/// A running app plus a client and a pool on the same database.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub pool: PgPool,
}

impl TestServer {
    /// Start the tasks app with in-memory sessions.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn tasks() -> Self {
        let pool = test_pool().await;
        let url = database_url();
        let config = orchard_tasks::config::TasksConfig::from_lookup(|key| match key {
            "TASKS_DATABASE_URL" => Some(url.clone()),
            "TASKS_BASE_URL" => Some("http://127.0.0.1".to_string()),
            _ => None,
        })
        .unwrap_or_else(|e| panic!("invalid tasks config: {e}"));

        let state = orchard_tasks::state::AppState::new(config, pool.clone());
        let app = orchard_tasks::app(state, tower_sessions::MemoryStore::default());
        Self::spawn(app, pool).await
    }

    /// Start the catalog with `per_page` products per page.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn catalog(per_page: u64) -> Self {
        let pool = test_pool().await;
        let url = database_url();
        let per_page = per_page.to_string();
        let config = orchard_catalog::config::CatalogConfig::from_lookup(|key| match key {
            "CATALOG_DATABASE_URL" => Some(url.clone()),
            "CATALOG_PER_PAGE" => Some(per_page.clone()),
            _ => None,
        })
        .unwrap_or_else(|e| panic!("invalid catalog config: {e}"));

        let state = orchard_catalog::state::AppState::new(config, pool.clone());
        Self::spawn(orchard_catalog::app(state), pool).await
    }

    async fn spawn(app: Router, pool: PgPool) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("failed to bind test listener: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("listener has no address: {e}"));

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        // Redirects are asserted, not followed.
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap_or_else(|e| panic!("failed to build HTTP client: {e}"));

        Self {
            base_url: format!("http://{addr}"),
            client,
            pool,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// The first `_token` hidden field value in `html`.
#[must_use]
pub fn csrf_token(html: &str) -> Option<String> {
    html.split("name=\"_token\" value=\"")
        .nth(1)?
        .split('"')
        .next()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_token_extraction() {
        let html = r#"<form><input type="hidden" name="_token" value="abc123"></form>"#;
        assert_eq!(csrf_token(html).as_deref(), Some("abc123"));
        assert_eq!(csrf_token("<p>no form</p>"), None);
    }
}
