//! Request and response bodies exchanged with the backend.

use std::collections::BTreeMap;

use cityguide_core::{Location, LocationId, NewLocation};
use serde::{Deserialize, Serialize};

/// `GET /locations/{id}` answers either with the record itself or with it
/// wrapped under `location`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DetailBody {
    Wrapped { location: Location },
    Bare(Location),
}

impl DetailBody {
    pub(crate) fn into_location(self) -> Location {
        match self {
            DetailBody::Wrapped { location } | DetailBody::Bare(location) => location,
        }
    }
}

/// Body of `POST /locations/`.
///
/// The backend insists on a client-supplied integer id; see
/// [`crate::BackendClient::create_location`].
#[derive(Debug, Serialize)]
pub(crate) struct CreateLocationPayload<'a> {
    pub id: u32,
    #[serde(flatten)]
    pub location: &'a NewLocation,
}

/// Response to a successful create.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedLocation {
    #[serde(default)]
    pub message: String,
    pub location: Location,
}

impl CreatedLocation {
    /// The identifier the backend stored the location under.
    #[must_use]
    pub fn id(&self) -> &LocationId {
        self.location.id()
    }
}

/// A photo to attach to a location.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type; inferred from the file extension when `None`.
    pub content_type: Option<String>,
}

impl PhotoUpload {
    /// Content type to send: explicit, or guessed from the extension.
    #[must_use]
    pub fn mime(&self) -> &str {
        if let Some(content_type) = self.content_type.as_deref() {
            return content_type;
        }
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("png") => "image/png",
            _ => "application/octet-stream",
        }
    }
}

/// Response to `POST /locations/uploadfile`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedPhoto {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Filters for the server-side `GET /locations/search/`.
///
/// Every field is a case-insensitive substring; unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub address: Option<String>,
    pub description: Option<String>,
    pub work_time: Option<String>,
}

impl SearchParams {
    pub(crate) fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("address", self.address.as_deref()),
            ("description", self.description.as_deref()),
            ("work_time", self.work_time.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub found_count: usize,
    pub locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContactsResponse {
    #[serde(default)]
    pub contacts: BTreeMap<String, String>,
}

/// Response to `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl HealthStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Response to `POST /voting/{id}/rate`.
#[derive(Debug, Clone, Deserialize)]
pub struct RatingReceipt {
    #[serde(default)]
    pub message: String,
    pub rating: u8,
}

/// Response to `GET /voting/{id}/stats`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VotingStats {
    pub average_rating: f64,
    pub total_votes: u32,
    #[serde(default)]
    pub rating_distribution: BTreeMap<String, u32>,
}

impl VotingStats {
    /// Average rating, or `None` when nobody has voted yet.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        (self.total_votes > 0).then_some(self.average_rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_body_accepts_bare_and_wrapped_records() {
        let bare: DetailBody = serde_json::from_value(json!({ "id": 1, "name": "A" })).unwrap();
        let wrapped: DetailBody =
            serde_json::from_value(json!({ "location": { "id": 2, "name": "B" } })).unwrap();
        assert_eq!(bare.into_location().name, "A");
        assert_eq!(wrapped.into_location().name, "B");
    }

    #[test]
    fn create_payload_flattens_location_with_id() {
        let draft = NewLocation {
            name: "Park".into(),
            kind: cityguide_core::LocationKind::Landmark,
            description: String::new(),
            address: "Main st".into(),
            coords: cityguide_core::Coordinate::new(48.0, 37.8),
            work_time: "24/7".into(),
            contacts: BTreeMap::new(),
        };
        let value = serde_json::to_value(CreateLocationPayload {
            id: 42,
            location: &draft,
        })
        .unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["name"], "Park");
        assert_eq!(value["addres"], "Main st");
        assert_eq!(value["type"], "site");
    }

    #[test]
    fn search_params_skip_unset_and_empty_fields() {
        let params = SearchParams {
            address: Some("Артема".into()),
            description: Some(String::new()),
            work_time: None,
        };
        assert_eq!(params.pairs(), vec![("address", "Артема")]);
    }

    #[test]
    fn voting_stats_without_votes_has_no_rating() {
        let stats: VotingStats = serde_json::from_value(json!({
            "location_id": 1,
            "average_rating": 0,
            "total_votes": 0,
            "rating_distribution": { "1": 0, "2": 0, "3": 0, "4": 0, "5": 0 },
            "message": "no votes"
        }))
        .unwrap();
        assert_eq!(stats.rating(), None);
    }

    #[test]
    fn voting_stats_with_votes_reports_average() {
        let stats: VotingStats = serde_json::from_value(json!({
            "average_rating": 4.33,
            "total_votes": 3,
        }))
        .unwrap();
        assert_eq!(stats.rating(), Some(4.33));
    }

    #[test]
    fn photo_mime_is_guessed_from_extension() {
        let photo = PhotoUpload {
            file_name: "Arena.JPG".into(),
            bytes: vec![],
            content_type: None,
        };
        assert_eq!(photo.mime(), "image/jpeg");
    }
}
