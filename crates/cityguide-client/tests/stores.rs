//! Ordering tests for the fetch-backed stores.
//!
//! A scripted source hands out one pending response per request; the test
//! releases them in whatever order it likes through `oneshot` channels, so
//! late-arriving responses can be simulated deterministically.

use std::collections::VecDeque;
use std::sync::Mutex;

use cityguide_client::{LocationCatalogStore, LocationDetailLoader};
use cityguide_core::{
    CatalogPresenter, Coordinate, FetchError, LoadState, Location, LocationId, LocationSource,
};
use tokio::sync::oneshot;

type CatalogReply = Result<Vec<Location>, FetchError>;
type DetailReply = Result<Location, FetchError>;

#[derive(Default)]
struct ScriptedSource {
    catalog: Mutex<VecDeque<oneshot::Receiver<CatalogReply>>>,
    detail: Mutex<VecDeque<oneshot::Receiver<DetailReply>>>,
}

impl ScriptedSource {
    fn expect_catalog(&self) -> oneshot::Sender<CatalogReply> {
        let (tx, rx) = oneshot::channel();
        self.catalog.lock().unwrap().push_back(rx);
        tx
    }

    fn expect_detail(&self) -> oneshot::Sender<DetailReply> {
        let (tx, rx) = oneshot::channel();
        self.detail.lock().unwrap().push_back(rx);
        tx
    }
}

impl LocationSource for ScriptedSource {
    async fn fetch_locations(&self) -> CatalogReply {
        let rx = self
            .catalog
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected catalog request");
        rx.await
            .unwrap_or_else(|_| Err(FetchError::NetworkFailure("dropped".into())))
    }

    async fn fetch_location(&self, _id: &LocationId) -> DetailReply {
        let rx = self
            .detail
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected detail request");
        rx.await
            .unwrap_or_else(|_| Err(FetchError::NetworkFailure("dropped".into())))
    }
}

fn location(id: &str, name: &str) -> Location {
    Location::new(
        LocationId::new(id),
        name,
        Some(Coordinate::new(48.0, 37.8)),
    )
}

#[tokio::test]
async fn late_response_from_first_reload_is_discarded() {
    let source = ScriptedSource::default();
    let first = source.expect_catalog();
    let second = source.expect_catalog();
    let store = LocationCatalogStore::new(source);

    let (a, b, ()) = tokio::join!(store.reload(), store.reload(), async {
        second
            .send(Ok(vec![location("2", "Хмели сунели")]))
            .unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        first
            .send(Ok(vec![location("1", "Донбасс арена")]))
            .unwrap();
    });

    let expected = LoadState::Loaded(vec![location("2", "Хмели сунели")]);
    assert_eq!(store.state(), expected);
    assert_eq!(a, expected, "stale caller sees the current state");
    assert_eq!(b, expected);
    assert_eq!(store.generation(), 2);
}

#[tokio::test]
async fn late_failure_from_first_reload_does_not_clobber_success() {
    let source = ScriptedSource::default();
    let first = source.expect_catalog();
    let second = source.expect_catalog();
    let store = LocationCatalogStore::new(source);

    tokio::join!(store.reload(), store.reload(), async {
        second.send(Ok(vec![location("2", "Park")])).unwrap();
        tokio::task::yield_now().await;
        first
            .send(Err(FetchError::NetworkFailure("timeout".into())))
            .unwrap();
    });

    assert_eq!(store.state(), LoadState::Loaded(vec![location("2", "Park")]));
}

#[tokio::test]
async fn in_order_responses_leave_the_newest_result() {
    let source = ScriptedSource::default();
    let first = source.expect_catalog();
    let second = source.expect_catalog();
    let store = LocationCatalogStore::new(source);

    tokio::join!(store.reload(), store.reload(), async {
        first.send(Ok(vec![location("1", "Old")])).unwrap();
        tokio::task::yield_now().await;
        second.send(Ok(vec![location("2", "New")])).unwrap();
    });

    assert_eq!(store.state(), LoadState::Loaded(vec![location("2", "New")]));
}

#[tokio::test]
async fn load_while_loading_joins_in_flight_request() {
    let source = ScriptedSource::default();
    let only = source.expect_catalog();
    let store = LocationCatalogStore::new(source);

    let (a, b, ()) = tokio::join!(store.load(), store.load(), async {
        only.send(Ok(vec![location("1", "Arena")])).unwrap();
    });

    assert_eq!(a, b);
    assert_eq!(a, LoadState::Loaded(vec![location("1", "Arena")]));
}

#[tokio::test]
async fn failed_catalog_recovers_on_reload() {
    let source = ScriptedSource::default();
    let failing = source.expect_catalog();
    let recovering = source.expect_catalog();
    failing
        .send(Err(FetchError::NetworkFailure("connection refused".into())))
        .unwrap();
    recovering.send(Ok(vec![location("1", "Arena")])).unwrap();
    let store = LocationCatalogStore::new(source);

    assert!(matches!(store.load().await, LoadState::Failed(_)));
    assert_eq!(
        store.reload().await,
        LoadState::Loaded(vec![location("1", "Arena")])
    );
}

#[tokio::test]
async fn presenter_scenario_over_loaded_store() {
    let source = ScriptedSource::default();
    source
        .expect_catalog()
        .send(Ok(vec![location("1", "Донбасс арена")]))
        .unwrap();
    let store = LocationCatalogStore::new(source);
    let mut presenter = CatalogPresenter::new(Coordinate::new(47.99, 37.81));

    assert_eq!(
        presenter.present(&store.state()),
        cityguide_core::CatalogView::Loading
    );

    let state = store.load().await;
    let view = presenter.present(&state);
    assert_eq!(view.entries().len(), 1);
    assert_eq!(view.entries()[0].name(), "Донбасс арена");
    assert!(view.entries()[0].distance.km().is_some_and(|km| km >= 0.0));

    presenter.set_query("донб");
    assert_eq!(presenter.present(&state).entries().len(), 1);
    presenter.set_query("хмели");
    assert!(presenter.present(&state).entries().is_empty());
}

#[tokio::test]
async fn navigating_away_discards_previous_detail() {
    let source = ScriptedSource::default();
    let record_a = source.expect_detail();
    let record_b = source.expect_detail();
    let loader = LocationDetailLoader::new(source);

    let a_id = LocationId::new("a");
    let b_id = LocationId::new("b");
    tokio::join!(loader.load_detail(&a_id), loader.load_detail(&b_id), async {
        record_b.send(Ok(location("b", "Record B"))).unwrap();
        tokio::task::yield_now().await;
        record_a.send(Ok(location("a", "Record A"))).unwrap();
    });

    assert_eq!(loader.current_id(), Some(b_id));
    assert_eq!(loader.state(), LoadState::Loaded(location("b", "Record B")));
}

#[tokio::test]
async fn unknown_detail_is_not_found() {
    let source = ScriptedSource::default();
    source
        .expect_detail()
        .send(Err(FetchError::NotFound("404".into())))
        .unwrap();
    let loader = LocationDetailLoader::new(source);

    let state = loader.load_detail(&LocationId::new("404")).await;
    let err = state.failure().expect("expected failure");
    assert!(matches!(err, FetchError::NotFound(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn loaded_detail_is_reused_for_same_id() {
    let source = ScriptedSource::default();
    source
        .expect_detail()
        .send(Ok(location("a", "Record A")))
        .unwrap();
    let loader = LocationDetailLoader::new(source);
    let id = LocationId::new("a");

    let first = loader.load_detail(&id).await;
    // A second request would panic in the scripted source.
    let second = loader.load_detail(&id).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn refresh_refetches_current_detail() {
    let source = ScriptedSource::default();
    source
        .expect_detail()
        .send(Ok(location("a", "Before")))
        .unwrap();
    source
        .expect_detail()
        .send(Ok(location("a", "After")))
        .unwrap();
    let loader = LocationDetailLoader::new(source);

    loader.load_detail(&LocationId::new("a")).await;
    assert_eq!(
        loader.refresh().await,
        LoadState::Loaded(location("a", "After"))
    );
}

#[tokio::test]
async fn refresh_without_navigation_is_a_no_op() {
    let loader = LocationDetailLoader::new(ScriptedSource::default());
    assert_eq!(loader.refresh().await, LoadState::NotStarted);
}
