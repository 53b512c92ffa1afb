pub mod catalog;
pub mod client;
pub mod detail;
pub mod error;
mod retry;
pub mod types;

pub use catalog::{CatalogSnapshot, LocationCatalogStore};
pub use client::BackendClient;
pub use detail::{DetailSnapshot, LocationDetailLoader};
pub use error::ClientError;
pub use types::{
    CreatedLocation, HealthStatus, PhotoUpload, RatingReceipt, SearchParams, UploadedPhoto,
    VotingStats,
};
