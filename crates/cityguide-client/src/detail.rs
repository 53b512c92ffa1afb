//! Fetch-backed holder of a single location's detail record.
//!
//! Uses the same generation discipline as [`crate::catalog`]: navigating to
//! another location supersedes any request still in flight for the
//! previous one.

use cityguide_core::{FetchError, LoadState, Location, LocationId, LocationSource};
use tokio::sync::watch;

/// Detail state, the identifier it belongs to, and its generation.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    pub generation: u64,
    pub id: Option<LocationId>,
    pub state: LoadState<Location>,
}

pub struct LocationDetailLoader<S> {
    source: S,
    state: watch::Sender<DetailSnapshot>,
}

impl<S> LocationDetailLoader<S>
where
    S: LocationSource,
{
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(DetailSnapshot {
            generation: 0,
            id: None,
            state: LoadState::NotStarted,
        });
        Self { source, state }
    }

    #[must_use]
    pub fn state(&self) -> LoadState<Location> {
        self.state.borrow().state.clone()
    }

    #[must_use]
    pub fn current_id(&self) -> Option<LocationId> {
        self.state.borrow().id.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.state.subscribe()
    }

    /// Shows location `id`.
    ///
    /// Joins an in-flight request for the same id and reuses a loaded record
    /// for it. A different id, or a previous failure, starts a new request.
    /// The returned state is the screen's state once nothing is in flight,
    /// which reflects the most recent navigation.
    pub async fn load_detail(&self, id: &LocationId) -> LoadState<Location> {
        let mut started = None;
        self.state.send_if_modified(|snap| {
            let same_id = snap.id.as_ref() == Some(id);
            let reusable = same_id && (snap.state.is_loading() || snap.state.loaded().is_some());
            if reusable {
                return false;
            }
            snap.generation += 1;
            snap.id = Some(id.clone());
            snap.state = LoadState::Loading;
            started = Some(snap.generation);
            true
        });

        match started {
            Some(generation) => self.fetch(generation, id).await,
            None => self.settled().await,
        }
    }

    /// Refetches the current location, if any.
    pub async fn refresh(&self) -> LoadState<Location> {
        let mut target = None;
        self.state.send_if_modified(|snap| {
            let Some(id) = snap.id.clone() else {
                return false;
            };
            snap.generation += 1;
            snap.state = LoadState::Loading;
            target = Some((snap.generation, id));
            true
        });

        match target {
            Some((generation, id)) => self.fetch(generation, &id).await,
            None => self.state(),
        }
    }

    async fn fetch(&self, generation: u64, id: &LocationId) -> LoadState<Location> {
        tracing::debug!(generation, location_id = %id, "fetching location detail");
        let result = self.source.fetch_location(id).await;
        self.apply(generation, result);
        self.settled().await
    }

    fn apply(&self, generation: u64, result: Result<Location, FetchError>) -> bool {
        self.state.send_if_modified(|snap| {
            if snap.generation != generation {
                tracing::warn!(
                    stale = generation,
                    current = snap.generation,
                    "discarding superseded detail response"
                );
                return false;
            }
            if let Err(err) = &result {
                tracing::warn!(generation, error = %err, "detail load failed");
            }
            snap.state = result.into();
            true
        })
    }

    async fn settled(&self) -> LoadState<Location> {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(|snap| !snap.state.is_loading()).await {
            Ok(snap) => snap.state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}
