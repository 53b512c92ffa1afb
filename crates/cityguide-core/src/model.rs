//! Location catalog data model.
//!
//! Field names follow the backend's wire format: `addres` for the street
//! address, `workTime` for operating hours, `coords` as a `[lat, lon]` array
//! and a numeric-or-string `id`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// A `(latitude, longitude)` pair in decimal degrees.
///
/// Serialized as a two-element array, which is how both the backend and the
/// map widget exchange points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite and inside -90..=90 / -180..=180.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns `self` if it lies within the valid latitude/longitude ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] for non-finite or
    /// out-of-range components.
    pub fn validate(self) -> Result<Self, CoreError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CoreError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.latitude, c.longitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored) and
/// validates the result.
impl FromStr for Coordinate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::MalformedCoordinate(s.to_owned());
        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        let latitude = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        Self::new(latitude, longitude).validate()
    }
}

/// Backend-assigned location identifier.
///
/// The backend emits integers; anything else is carried verbatim as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawLocationId", into = "String")]
pub struct LocationId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLocationId {
    Number(u64),
    Text(String),
}

impl From<RawLocationId> for LocationId {
    fn from(raw: RawLocationId) -> Self {
        match raw {
            RawLocationId::Number(n) => Self(n.to_string()),
            RawLocationId::Text(s) => Self(s),
        }
    }
}

impl From<LocationId> for String {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

impl LocationId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for LocationId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location category.
///
/// Wire names are `"site"` and `"restoraunt"` (sic); `"landmark"` and
/// `"restaurant"` are accepted on input. Unknown values become `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LocationKind {
    Landmark,
    Restaurant,
    #[default]
    Other,
}

impl LocationKind {
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            LocationKind::Landmark => "site",
            LocationKind::Restaurant => "restoraunt",
            LocationKind::Other => "other",
        }
    }
}

impl From<String> for LocationKind {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<LocationKind> for String {
    fn from(kind: LocationKind) -> Self {
        kind.wire_name().to_owned()
    }
}

impl FromStr for LocationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "site" | "landmark" => Ok(LocationKind::Landmark),
            "restoraunt" | "restaurant" => Ok(LocationKind::Restaurant),
            "other" => Ok(LocationKind::Other),
            other => Err(CoreError::InvalidLocation(format!(
                "unknown location type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationKind::Landmark => write!(f, "landmark"),
            LocationKind::Restaurant => write!(f, "restaurant"),
            LocationKind::Other => write!(f, "other"),
        }
    }
}

/// A point of interest as returned by the backend.
///
/// `coords` is optional so that a single malformed record still
/// deserializes: anything other than a `[lat, lon]` number pair becomes
/// `None`. Callers that need a distance must handle its absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: LocationId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: LocationKind,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "addres", alias = "address", default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_coords")]
    pub coords: Option<Coordinate>,
    #[serde(rename = "workTime", alias = "work_time", default, deserialize_with = "null_as_empty")]
    pub work_time: String,
    #[serde(default)]
    pub contacts: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl Location {
    /// Builds a record with the given identity and every other attribute
    /// empty.
    #[must_use]
    pub fn new(id: LocationId, name: impl Into<String>, coords: Option<Coordinate>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: LocationKind::default(),
            description: String::new(),
            address: String::new(),
            coords,
            work_time: String::new(),
            contacts: BTreeMap::new(),
            photo: None,
            rating: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LocationId {
        &self.id
    }

    /// The coordinate, if present and within range.
    ///
    /// # Errors
    ///
    /// [`CoreError::MissingCoordinate`] when absent,
    /// [`CoreError::InvalidCoordinate`] when out of range.
    pub fn coordinate(&self) -> Result<Coordinate, CoreError> {
        self.coords.ok_or(CoreError::MissingCoordinate)?.validate()
    }
}

/// Form data for a location that does not exist yet.
///
/// The identifier is attached by the client at submission time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLocation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub description: String,
    #[serde(rename = "addres")]
    pub address: String,
    pub coords: Coordinate,
    #[serde(rename = "workTime")]
    pub work_time: String,
    pub contacts: BTreeMap<String, String>,
}

impl NewLocation {
    /// Checks the invariants the backend does not enforce itself.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidLocation`] for a blank name,
    /// [`CoreError::InvalidCoordinate`] for an out-of-range point.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidLocation("name must not be empty".into()));
        }
        self.coords.validate()?;
        Ok(())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoords {
    Pair([f64; 2]),
    Other(serde::de::IgnoredAny),
}

fn lenient_coords<'de, D>(deserializer: D) -> Result<Option<Coordinate>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawCoords::deserialize(deserializer)? {
        RawCoords::Pair(pair) => Ok(Some(Coordinate::from(pair))),
        RawCoords::Other(_) => {
            tracing::debug!("ignoring malformed location coords");
            Ok(None)
        }
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
