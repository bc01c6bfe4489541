//! Subcommand implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Read a connection string, falling back to `DATABASE_URL`.
///
/// Returns `None` when neither variable is set.
pub fn database_url(key: &str) -> Option<SecretString> {
    let _ = dotenvy::dotenv();
    std::env::var(key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
}
