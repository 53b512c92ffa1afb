//! Free-text name filter for the catalog.

use std::borrow::Cow;

use crate::entry::CatalogEntry;

/// Case-insensitive substring query over location names.
///
/// The empty string matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    folded: String,
}

impl SearchQuery {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.is_empty() || name.to_lowercase().contains(&self.folded)
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Keeps the entries whose name contains `query`, in source order.
///
/// An empty query borrows the input untouched.
#[must_use]
pub fn filter<'a>(entries: &'a [CatalogEntry], query: &SearchQuery) -> Cow<'a, [CatalogEntry]> {
    if query.is_empty() {
        return Cow::Borrowed(entries);
    }
    Cow::Owned(
        entries
            .iter()
            .filter(|entry| query.matches(entry.name()))
            .cloned()
            .collect(),
    )
}
