use std::fmt;

use crate::geo::distance_km;
use crate::model::{Coordinate, Location};

/// Distance from the user, rounded to 0.1 km, or a sentinel when the record's
/// coordinate is missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    Km(f64),
    Unknown,
}

impl Distance {
    /// Rounds a raw kilometre value to one decimal place.
    #[must_use]
    pub fn from_km(km: f64) -> Self {
        Distance::Km((km * 10.0).round() / 10.0)
    }

    #[must_use]
    pub fn km(self) -> Option<f64> {
        match self {
            Distance::Km(km) => Some(km),
            Distance::Unknown => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Km(km) => write!(f, "{km:.1} км"),
            Distance::Unknown => write!(f, "—"),
        }
    }
}

/// A location enriched with its distance from the user.
///
/// Derived on every presentation pass; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub location: Location,
    pub distance: Distance,
}

impl CatalogEntry {
    /// Computes the entry for `location` relative to `user`.
    ///
    /// A bad coordinate on the record (or on `user`) yields
    /// [`Distance::Unknown`] instead of an error.
    #[must_use]
    pub fn new(location: Location, user: Coordinate) -> Self {
        let distance = match location
            .coordinate()
            .and_then(|coords| distance_km(user, coords))
        {
            Ok(km) => Distance::from_km(km),
            Err(err) => {
                tracing::debug!(
                    location_id = %location.id(),
                    error = %err,
                    "distance unavailable for location"
                );
                Distance::Unknown
            }
        };
        Self { location, distance }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.location.name
    }

    /// Placeholder until a rating pipeline exists; `None` unless the record
    /// carries one.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.location.rating
    }
}
