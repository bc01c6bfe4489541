//! Orchard CLI - database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run tasks / catalog / all migrations
//! orchard migrate tasks
//! orchard migrate catalog
//! orchard migrate all
//!
//! # Seed the catalog (users must exist before products)
//! orchard seed users --count 10
//! orchard seed products --count 50
//! orchard seed all --users 10 --products 50 --seed 42
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "orchard")]
#[command(author, version, about = "Orchard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Fill the catalog database with generated data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,

        /// RNG seed for reproducible output
        #[arg(long, global = true)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run tasks app migrations
    Tasks,
    /// Run catalog migrations
    Catalog,
    /// Run all migrations
    All,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Generate users
    Users {
        #[arg(short, long, default_value_t = 10)]
        count: usize,
    },
    /// Generate products owned by existing users
    Products {
        #[arg(short, long, default_value_t = 50)]
        count: usize,
    },
    /// Generate users, then products
    All {
        #[arg(long, default_value_t = 10)]
        users: usize,
        #[arg(long, default_value_t = 50)]
        products: usize,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Tasks => commands::migrate::tasks().await?,
            MigrateTarget::Catalog => commands::migrate::catalog().await?,
            MigrateTarget::All => {
                commands::migrate::tasks().await?;
                commands::migrate::catalog().await?;
            }
        },
        Commands::Seed { target, seed } => {
            let result = match target {
                SeedTarget::Users { count } => commands::seed::users(count, seed).await,
                SeedTarget::Products { count } => commands::seed::products(count, seed).await,
                SeedTarget::All { users, products } => {
                    commands::seed::all(users, products, seed).await
                }
            };
            if let Err(e) = &result
                && e.is_missing_users()
            {
                tracing::error!("No users to own products; run `orchard seed users` first");
            }
            result?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_flag_is_global() {
        let cli = Cli::try_parse_from(["orchard", "seed", "products", "--count", "5", "--seed", "7"])
            .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Seed {
                target: SeedTarget::Products { count },
                seed,
            } => {
                assert_eq!(count, 5);
                assert_eq!(seed, Some(7));
            }
            _ => panic!("expected seed products"),
        }
    }

    #[test]
    fn test_seed_all_defaults() {
        let cli = Cli::try_parse_from(["orchard", "seed", "all"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Seed {
                target: SeedTarget::All {
                    users: 10,
                    products: 50
                },
                seed: None,
            }
        ));
    }
}
