//! `add` subcommand.
//!
//! There is no interactive map in a terminal, so clicks are given on the
//! command line and replayed through a scripted map widget. The picker sees
//! them exactly as it would see clicks from a real map, including ignoring
//! out-of-range points.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use cityguide_client::{BackendClient, PhotoUpload};
use cityguide_core::{
    AppConfig, ClickHandler, Coordinate, LocationKind, MapCoordinatePicker, MapView, MapWidget,
    NewLocation,
};

#[derive(Debug, clap::Args)]
pub(crate) struct AddArgs {
    #[arg(long)]
    pub name: String,
    /// site (landmark), restaurant or other
    #[arg(long, default_value = "site")]
    pub kind: LocationKind,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub hours: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub vk: Option<String>,
    #[arg(long)]
    pub telegram: Option<String>,
    /// Map click as "lat,lon"; repeat to click several times, the last valid
    /// click wins. Without clicks the city centre is used.
    #[arg(long = "click", value_parser = parse_click, allow_hyphen_values = true)]
    pub clicks: Vec<Coordinate>,
    /// JPEG or PNG to upload after the location is created
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

/// Parses a click without range validation; rejecting bad points is the
/// picker's job.
pub(crate) fn parse_click(s: &str) -> Result<Coordinate, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got '{s}'"))?;
    let lat = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let lon = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Coordinate::new(lat, lon))
}

/// Map widget that replays a fixed list of clicks.
#[derive(Default)]
pub(crate) struct ScriptedMap {
    pub view: Option<MapView>,
    handler: Option<ClickHandler>,
}

impl ScriptedMap {
    pub fn replay(&mut self, clicks: &[Coordinate]) {
        if let Some(handler) = self.handler.as_mut() {
            for click in clicks {
                handler(*click);
            }
        }
    }
}

impl MapWidget for ScriptedMap {
    fn initialize(&mut self, view: MapView) {
        tracing::debug!(center = %view.center, zoom = view.zoom, "map initialized");
        self.view = Some(view);
    }

    fn on_click(&mut self, handler: ClickHandler) {
        self.handler = Some(handler);
    }
}

pub(crate) async fn run_add(
    client: &BackendClient,
    config: &AppConfig,
    args: AddArgs,
) -> anyhow::Result<()> {
    let view = MapView::new(config.city_center, config.map_zoom)
        .context("invalid map configuration")?;
    let mut map = ScriptedMap::default();
    let picker = MapCoordinatePicker::attach(&mut map, view);
    map.replay(&args.clicks);

    let mut contacts = BTreeMap::new();
    if let Some(vk) = args.vk {
        contacts.insert("vk".to_string(), vk);
    }
    if let Some(telegram) = args.telegram {
        contacts.insert("telegram".to_string(), telegram);
    }

    let draft = NewLocation {
        name: args.name,
        kind: args.kind,
        description: args.description,
        address: args.address,
        coords: picker.current_coordinate(),
        work_time: args.hours,
        contacts,
    };

    let photo = match args.photo {
        Some(path) => Some(read_photo(path).await?),
        None => None,
    };

    let created = client
        .submit_new_location(&draft, photo.as_ref())
        .await
        .context("failed to add location")?;

    if !created.message.is_empty() {
        println!("{}", created.message);
    }
    println!(
        "added {} at {} as id {}",
        created.location.name,
        draft.coords,
        created.id()
    );
    Ok(())
}

async fn read_photo(path: PathBuf) -> anyhow::Result<PhotoUpload> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read photo {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("photo path has no file name")?;
    Ok(PhotoUpload {
        file_name,
        bytes,
        content_type: None,
    })
}
