pub mod app_config;
pub mod config;
pub mod entry;
pub mod geo;
pub mod load_state;
pub mod map_picker;
pub mod model;
pub mod presenter;
pub mod search;
pub mod source;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use entry::{CatalogEntry, Distance};
pub use geo::{distance_km, EARTH_RADIUS_KM};
pub use load_state::{FetchError, LoadState};
pub use map_picker::{ClickHandler, MapCoordinatePicker, MapView, MapWidget};
pub use model::{Coordinate, Location, LocationId, LocationKind, NewLocation};
pub use presenter::{CatalogOrder, CatalogPresenter, CatalogView};
pub use search::{filter, SearchQuery};
pub use source::LocationSource;

/// Errors raised by pure domain operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("missing coordinate")]
    MissingCoordinate,

    #[error("malformed coordinate \"{0}\": expected \"lat,lon\"")]
    MalformedCoordinate(String),

    #[error("invalid map zoom {0}: expected 0..=19")]
    InvalidZoom(u8),

    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
