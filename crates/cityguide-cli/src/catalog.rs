//! `catalog` and `search` subcommands.

use std::sync::Arc;

use anyhow::Context;
use cityguide_client::{BackendClient, LocationCatalogStore, SearchParams};
use cityguide_core::{
    AppConfig, CatalogEntry, CatalogOrder, CatalogPresenter, CatalogView, Coordinate, LoadState,
};
use futures::stream::{self, StreamExt};

/// Concurrent voting-stats requests when `--ratings` is set.
const RATING_CONCURRENCY: usize = 4;

#[derive(Debug, clap::Args)]
pub(crate) struct CatalogArgs {
    /// Case-insensitive substring of the location name
    #[arg(long, short, default_value = "")]
    pub query: String,
    /// Reference position as "lat,lon" (defaults to CITYGUIDE_USER_POSITION)
    #[arg(long, allow_hyphen_values = true)]
    pub near: Option<Coordinate>,
    /// Sort nearest first instead of backend order
    #[arg(long)]
    pub nearest: bool,
    /// Fetch average ratings for the listed locations
    #[arg(long)]
    pub ratings: bool,
}

#[derive(Debug, clap::Args)]
pub(crate) struct SearchArgs {
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub work_time: Option<String>,
}

pub(crate) async fn run_catalog(
    client: Arc<BackendClient>,
    config: &AppConfig,
    args: CatalogArgs,
) -> anyhow::Result<()> {
    let mut presenter = CatalogPresenter::new(args.near.unwrap_or(config.user_position));
    presenter.set_query(args.query);
    if args.nearest {
        presenter.set_order(CatalogOrder::Nearest);
    }

    let store = LocationCatalogStore::new(Arc::clone(&client));
    let state = store.load().await;
    let mut view = presenter.present(&state);

    if args.ratings {
        if let CatalogView::Ready(entries) = &mut view {
            attach_ratings(&client, entries).await;
        }
    }

    render(&view)
}

pub(crate) async fn run_search(
    client: &BackendClient,
    config: &AppConfig,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let params = SearchParams {
        address: args.address,
        description: args.description,
        work_time: args.work_time,
    };
    let found = client
        .search_locations(&params)
        .await
        .context("search request failed")?;

    let presenter = CatalogPresenter::new(config.user_position);
    render(&presenter.present(&LoadState::Loaded(found)))
}

/// Fills `location.rating` from voting stats. A failed lookup leaves the
/// rating empty.
async fn attach_ratings(client: &BackendClient, entries: &mut [CatalogEntry]) {
    let ratings: Vec<Option<f64>> = stream::iter(entries.iter())
        .map(|entry| async move {
            match client.voting_stats(entry.location.id()).await {
                Ok(stats) => stats.rating(),
                Err(err) => {
                    tracing::warn!(location_id = %entry.location.id(), error = %err, "rating lookup failed");
                    None
                }
            }
        })
        .buffered(RATING_CONCURRENCY)
        .collect()
        .await;

    for (entry, rating) in entries.iter_mut().zip(ratings) {
        entry.location.rating = rating;
    }
}

fn render(view: &CatalogView) -> anyhow::Result<()> {
    match view {
        CatalogView::Loading => println!("loading…"),
        CatalogView::Error(err) => {
            anyhow::bail!("{}: {err}", err.user_message());
        }
        CatalogView::Empty { filtered: true } => println!("no locations match the search"),
        CatalogView::Empty { filtered: false } => println!("the catalog is empty"),
        CatalogView::Ready(entries) => {
            for entry in entries {
                println!("{}", format_entry(entry));
            }
        }
    }
    Ok(())
}

pub(crate) fn format_entry(entry: &CatalogEntry) -> String {
    let rating = entry
        .rating()
        .map_or_else(|| "—".to_string(), |r| format!("{r:.1}"));
    format!(
        "{:>6}  {}  [{}]  ★ {}  {}",
        entry.location.id(),
        entry.name(),
        entry.location.kind,
        rating,
        entry.distance
    )
}
