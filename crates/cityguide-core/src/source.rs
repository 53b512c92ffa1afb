//! The seam between fetch-backed stores and whatever serves locations.

use std::future::Future;
use std::sync::Arc;

use crate::load_state::FetchError;
use crate::model::{Location, LocationId};

/// Asynchronous provider of catalog and detail records.
///
/// The HTTP backend client implements this; tests substitute scripted
/// sources to control response ordering.
pub trait LocationSource {
    /// Every location in the catalog, in backend order.
    fn fetch_locations(&self) -> impl Future<Output = Result<Vec<Location>, FetchError>> + Send;

    /// A single location. Must return [`FetchError::NotFound`] for an
    /// unknown identifier.
    fn fetch_location(
        &self,
        id: &LocationId,
    ) -> impl Future<Output = Result<Location, FetchError>> + Send;
}

impl<T> LocationSource for Arc<T>
where
    T: LocationSource + Send + Sync,
{
    fn fetch_locations(&self) -> impl Future<Output = Result<Vec<Location>, FetchError>> + Send {
        (**self).fetch_locations()
    }

    fn fetch_location(
        &self,
        id: &LocationId,
    ) -> impl Future<Output = Result<Location, FetchError>> + Send {
        (**self).fetch_location(id)
    }
}
