//! Fetch-backed holder of the location catalog.
//!
//! Every load is tagged with a generation number. A response is applied only
//! if its generation is still the newest one, so a slow response from an
//! earlier request can never overwrite the result of a later `reload()`.
//! Superseded requests are not aborted; their results are dropped on
//! arrival.

use cityguide_core::{FetchError, LoadState, Location, LocationSource};
use tokio::sync::watch;

/// Catalog state together with the generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub generation: u64,
    pub state: LoadState<Vec<Location>>,
}

/// Owns the catalog for one screen.
///
/// All methods take `&self`; concurrent callers on the same task (or
/// across tasks, behind an `Arc`) see one consistent state.
pub struct LocationCatalogStore<S> {
    source: S,
    state: watch::Sender<CatalogSnapshot>,
}

impl<S> LocationCatalogStore<S>
where
    S: LocationSource,
{
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(CatalogSnapshot {
            generation: 0,
            state: LoadState::NotStarted,
        });
        Self { source, state }
    }

    #[must_use]
    pub fn state(&self) -> LoadState<Vec<Location>> {
        self.state.borrow().state.clone()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    /// Receiver that observes every applied state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.state.subscribe()
    }

    /// Starts the first fetch if none has happened yet.
    ///
    /// While a fetch is in flight this joins it instead of issuing another
    /// request. Once settled, returns the settled state without refetching;
    /// use [`reload`](Self::reload) to refresh.
    pub async fn load(&self) -> LoadState<Vec<Location>> {
        let mut started = None;
        self.state.send_if_modified(|snap| {
            if matches!(snap.state, LoadState::NotStarted) {
                snap.generation += 1;
                snap.state = LoadState::Loading;
                started = Some(snap.generation);
                true
            } else {
                false
            }
        });

        match started {
            Some(generation) => self.fetch(generation).await,
            None => self.settled().await,
        }
    }

    /// Fetches again regardless of the current state, superseding any
    /// request still in flight.
    pub async fn reload(&self) -> LoadState<Vec<Location>> {
        let mut generation = 0;
        self.state.send_modify(|snap| {
            snap.generation += 1;
            snap.state = LoadState::Loading;
            generation = snap.generation;
        });
        self.fetch(generation).await
    }

    async fn fetch(&self, generation: u64) -> LoadState<Vec<Location>> {
        tracing::debug!(generation, "fetching location catalog");
        let result = self.source.fetch_locations().await;
        self.apply(generation, result);
        self.settled().await
    }

    /// Applies `result` if `generation` is still current. Returns whether it
    /// was applied.
    fn apply(&self, generation: u64, result: Result<Vec<Location>, FetchError>) -> bool {
        self.state.send_if_modified(|snap| {
            if snap.generation != generation {
                tracing::warn!(
                    stale = generation,
                    current = snap.generation,
                    "discarding superseded catalog response"
                );
                return false;
            }
            match &result {
                Ok(locations) => {
                    tracing::info!(generation, count = locations.len(), "catalog loaded");
                }
                Err(err) => tracing::warn!(generation, error = %err, "catalog load failed"),
            }
            snap.state = result.into();
            true
        })
    }

    /// Waits until no fetch is in flight and returns the resulting state.
    async fn settled(&self) -> LoadState<Vec<Location>> {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(|snap| !snap.state.is_loading()).await {
            Ok(snap) => snap.state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}
