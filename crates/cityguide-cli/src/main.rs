mod catalog;
mod create;
mod detail;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cityguide_client::BackendClient;
use cityguide_core::{Coordinate, LocationId};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cityguide")]
#[command(about = "Browse and extend the city guide location catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the catalog with distances from the user
    Catalog(catalog::CatalogArgs),
    /// Server-side search by address, description or working hours
    Search(catalog::SearchArgs),
    /// Show one location in detail
    Show {
        id: String,
        /// Reference position as "lat,lon" (defaults to CITYGUIDE_USER_POSITION)
        #[arg(long, allow_hyphen_values = true)]
        near: Option<Coordinate>,
    },
    /// Add a location at a point picked on the map
    Add(create::AddArgs),
    /// Rate a location from 1 to 5
    Rate {
        id: String,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
    /// Check that the backend is reachable
    Health,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config =
        cityguide_core::load_app_config_from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let cli = Cli::parse();
    let client = Arc::new(
        BackendClient::from_config(&config).context("failed to build backend client")?,
    );

    match cli.command {
        Commands::Catalog(args) => catalog::run_catalog(client, &config, args).await,
        Commands::Search(args) => catalog::run_search(&client, &config, args).await,
        Commands::Show { id, near } => {
            detail::run_show(client, near.unwrap_or(config.user_position), LocationId::new(id))
                .await
        }
        Commands::Add(args) => create::run_add(&client, &config, args).await,
        Commands::Rate { id, rating } => {
            let receipt = client
                .rate_location(&LocationId::new(id), rating)
                .await
                .context("failed to submit rating")?;
            println!("rated {} ★ {}", receipt.rating, receipt.message);
            Ok(())
        }
        Commands::Health => {
            let health = client.health().await.context("backend unreachable")?;
            println!("{} ({})", health.status, health.service);
            if health.is_healthy() {
                Ok(())
            } else {
                anyhow::bail!("backend reports status '{}'", health.status)
            }
        }
    }
}

#[cfg(test)]
mod tests;
