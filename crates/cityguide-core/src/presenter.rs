//! Turns the catalog's load state into what the catalog screen renders.

use std::cmp::Ordering;

use crate::entry::CatalogEntry;
use crate::load_state::{FetchError, LoadState};
use crate::model::{Coordinate, Location};
use crate::search::{filter, SearchQuery};

/// How the presented entries are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrder {
    /// Backend order.
    #[default]
    AsReceived,
    /// Nearest first; unknown distances last. Ties keep backend order.
    Nearest,
}

/// Renderable state of the catalog screen.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Loading,
    Error(FetchError),
    /// The catalog loaded but nothing is left to show. `filtered` is `true`
    /// when the search query hid every entry.
    Empty { filtered: bool },
    Ready(Vec<CatalogEntry>),
}

impl CatalogView {
    /// Entries to render; empty for every non-`Ready` view.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        match self {
            CatalogView::Ready(entries) => entries,
            _ => &[],
        }
    }
}

/// Per-screen presentation settings: the user's reference position, the
/// current search text and the ordering.
#[derive(Debug, Clone)]
pub struct CatalogPresenter {
    user_position: Coordinate,
    query: SearchQuery,
    order: CatalogOrder,
}

impl CatalogPresenter {
    #[must_use]
    pub fn new(user_position: Coordinate) -> Self {
        Self {
            user_position,
            query: SearchQuery::default(),
            order: CatalogOrder::default(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = SearchQuery::new(query);
    }

    pub fn set_user_position(&mut self, position: Coordinate) {
        self.user_position = position;
    }

    pub fn set_order(&mut self, order: CatalogOrder) {
        self.order = order;
    }

    #[must_use]
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    #[must_use]
    pub fn user_position(&self) -> Coordinate {
        self.user_position
    }

    /// Builds the view for `state`.
    ///
    /// Entries are recomputed from scratch on every call so a new catalog or
    /// user position is always reflected.
    #[must_use]
    pub fn present(&self, state: &LoadState<Vec<Location>>) -> CatalogView {
        let locations = match state {
            LoadState::NotStarted | LoadState::Loading => return CatalogView::Loading,
            LoadState::Failed(err) => return CatalogView::Error(err.clone()),
            LoadState::Loaded(locations) => locations,
        };

        let entries: Vec<CatalogEntry> = locations
            .iter()
            .map(|loc| CatalogEntry::new(loc.clone(), self.user_position))
            .collect();

        let mut visible = filter(&entries, &self.query).into_owned();
        if self.order == CatalogOrder::Nearest {
            visible.sort_by(compare_distance);
        }

        if visible.is_empty() {
            CatalogView::Empty {
                filtered: !entries.is_empty(),
            }
        } else {
            CatalogView::Ready(visible)
        }
    }
}

fn compare_distance(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    match (a.distance.km(), b.distance.km()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "presenter_test.rs"]
mod tests;
