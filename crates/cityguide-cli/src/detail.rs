//! `show` subcommand.

use std::sync::Arc;

use cityguide_client::{BackendClient, LocationDetailLoader};
use cityguide_core::map_picker::DETAIL_ZOOM;
use cityguide_core::{CatalogEntry, Coordinate, FetchError, LoadState, LocationId, MapView};

pub(crate) async fn run_show(
    client: Arc<BackendClient>,
    user_position: Coordinate,
    id: LocationId,
) -> anyhow::Result<()> {
    let loader = LocationDetailLoader::new(Arc::clone(&client));

    let location = match loader.load_detail(&id).await {
        LoadState::Loaded(location) => location,
        LoadState::Failed(FetchError::NotFound(_)) => {
            anyhow::bail!("location {id} does not exist");
        }
        LoadState::Failed(err) => anyhow::bail!("{}: {err}", err.user_message()),
        LoadState::NotStarted | LoadState::Loading => {
            anyhow::bail!("location {id} did not finish loading")
        }
    };

    println!("{}  [{}]", location.name, location.kind);
    if !location.address.is_empty() {
        println!("address:  {}", location.address);
    }
    if !location.work_time.is_empty() {
        println!("hours:    {}", location.work_time);
    }
    for (network, handle) in &location.contacts {
        println!("{network:<9} {handle}");
    }
    if let Some(url) = client.photo_url(&location) {
        println!("photo:    {url}");
    }
    if let Some(view) = location
        .coords
        .and_then(|c| MapView::new(c, DETAIL_ZOOM).ok())
    {
        println!("map:      {} (zoom {})", view.center, view.zoom);
    }

    let entry = CatalogEntry::new(location, user_position);
    println!("distance: {}", entry.distance);
    if !entry.location.description.is_empty() {
        println!();
        println!("{}", entry.location.description);
    }
    Ok(())
}
