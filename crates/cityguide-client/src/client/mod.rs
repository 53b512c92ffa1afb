//! HTTP client for the location backend.
//!
//! Wraps `reqwest` with the backend's status conventions (404 for unknown
//! ids, FastAPI `{"detail": ...}` bodies for rejected input), a fixed request
//! deadline, and retry with backoff on transient failures.

mod voting;

use std::collections::BTreeMap;
use std::time::Duration;

use cityguide_core::{AppConfig, FetchError, Location, LocationId, LocationSource, NewLocation};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::retry::{retry_with_backoff, Replay};
use crate::types::{
    ContactsResponse, CreateLocationPayload, CreatedLocation, DetailBody, PhotoUpload,
    SearchParams, SearchResponse, UploadedPhoto,
};

/// Client for the location backend.
///
/// Use [`BackendClient::from_config`] in the binary, or
/// [`BackendClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^attempt`.
    backoff_base_ms: u64,
}

impl BackendClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// `timeout_secs` bounds every request end to end; an elapsed deadline
    /// surfaces as [`ClientError::Http`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if `base_url` does not parse or
    ///   cannot carry a path.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so joined paths append to
        // the base rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`BackendClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the full catalog from `GET /locations/`, in backend order.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or timeout after retries.
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::Rejected`] on a
    ///   non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not an array of
    ///   location records.
    pub async fn list_locations(&self) -> Result<Vec<Location>, ClientError> {
        let url = self.endpoint(&["locations", ""]);
        let locations: Vec<Location> = self
            .execute("list locations", || self.client.get(url.clone()))
            .await?;
        tracing::debug!(count = locations.len(), "fetched location catalog");
        Ok(locations)
    }

    /// Fetches one location from `GET /locations/{id}`, accepting both a
    /// bare record and one wrapped under `location`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the backend answers 404.
    /// - Otherwise as for [`BackendClient::list_locations`].
    pub async fn get_location(&self, id: &LocationId) -> Result<Location, ClientError> {
        let url = self.endpoint(&["locations", id.as_str()]);
        let body: DetailBody = self
            .execute(&format!("location {id}"), || self.client.get(url.clone()))
            .await?;
        Ok(body.into_location())
    }

    /// Fetches `GET /locations/{id}/contacts`.
    ///
    /// # Errors
    ///
    /// As for [`BackendClient::get_location`].
    pub async fn get_contacts(
        &self,
        id: &LocationId,
    ) -> Result<BTreeMap<String, String>, ClientError> {
        let url = self.endpoint(&["locations", id.as_str(), "contacts"]);
        let body: ContactsResponse = self
            .execute(&format!("contacts for {id}"), || self.client.get(url.clone()))
            .await?;
        Ok(body.contacts)
    }

    /// Server-side search over address, description and working hours.
    ///
    /// # Errors
    ///
    /// As for [`BackendClient::list_locations`].
    pub async fn search_locations(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<Location>, ClientError> {
        let mut url = self.endpoint(&["locations", "search", ""]);
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params.pairs() {
                query.append_pair(key, value);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let body: SearchResponse = self
            .execute("search locations", || self.client.get(url.clone()))
            .await?;
        tracing::debug!(found = body.found_count, "server-side search finished");
        Ok(body.locations)
    }

    /// Creates a location via `POST /locations/`.
    ///
    /// The backend requires the client to pick an integer id. One is drawn
    /// at random from the full `u32` range; the id echoed in the response is
    /// the one callers must use afterwards.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidInput`] if `draft` fails validation; nothing
    ///   is sent.
    /// - [`ClientError::Rejected`] if the backend refuses the payload, which
    ///   includes an id collision.
    /// - Otherwise as for [`BackendClient::list_locations`].
    pub async fn create_location(
        &self,
        draft: &NewLocation,
    ) -> Result<CreatedLocation, ClientError> {
        draft.validate()?;
        let payload = CreateLocationPayload {
            id: rand::random::<u32>().max(1),
            location: draft,
        };
        let url = self.endpoint(&["locations", ""]);
        // A timed-out create may still have been stored, and replaying it
        // with the same id would come back as a duplicate.
        let created: CreatedLocation = self
            .execute_with("create location", Replay::NonIdempotent, || {
                Ok(self.client.post(url.clone()).json(&payload))
            })
            .await?;
        tracing::info!(location_id = %created.id(), name = %draft.name, "location created");
        Ok(created)
    }

    /// Attaches a photo via multipart `POST /locations/uploadfile`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidContentType`] if the photo's content type is
    ///   not a valid MIME type; nothing is sent.
    /// - Otherwise as for [`BackendClient::list_locations`].
    pub async fn upload_photo(
        &self,
        id: &LocationId,
        photo: &PhotoUpload,
    ) -> Result<UploadedPhoto, ClientError> {
        let url = self.endpoint(&["locations", "uploadfile"]);
        let mime = photo.mime().to_owned();
        // A multipart body is consumed on send, so each attempt builds its own.
        self.execute_with(&format!("photo upload for {id}"), Replay::Idempotent, || {
            let part = Part::bytes(photo.bytes.clone())
                .file_name(photo.file_name.clone())
                .mime_str(&mime)
                .map_err(|_| ClientError::InvalidContentType(mime.clone()))?;
            let form = Form::new()
                .text("location_id", id.as_str().to_owned())
                .part("file", part);
            Ok(self.client.post(url.clone()).multipart(form))
        })
        .await
    }

    /// Creates a location and, if given, uploads its photo under the id the
    /// backend echoed back.
    ///
    /// # Errors
    ///
    /// Any error from [`BackendClient::create_location`] or
    /// [`BackendClient::upload_photo`]. A failed upload leaves the created
    /// location in place.
    pub async fn submit_new_location(
        &self,
        draft: &NewLocation,
        photo: Option<&PhotoUpload>,
    ) -> Result<CreatedLocation, ClientError> {
        let mut created = self.create_location(draft).await?;
        if let Some(photo) = photo {
            let uploaded = self.upload_photo(created.id(), photo).await?;
            if let Some(url) = uploaded.url {
                created.location.photo = Some(url);
            }
        }
        Ok(created)
    }

    /// Absolute URL for a location's photo; relative paths resolve against
    /// the backend root.
    #[must_use]
    pub fn photo_url(&self, location: &Location) -> Option<Url> {
        let photo = location.photo.as_deref()?;
        Url::parse(photo)
            .or_else(|_| self.base_url.join(photo.trim_start_matches('/')))
            .ok()
    }

    /// Builds `base_url` + `segments`, percent-encoding each segment. A
    /// trailing `""` segment yields a trailing slash.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends an idempotent request built by `build`, retrying transient
    /// failures, and decodes a 2xx JSON body into `T`.
    async fn execute<T, F>(&self, context: &str, build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        self.execute_with(context, Replay::Idempotent, || Ok(build()))
            .await
    }

    /// Like [`Self::execute`], with an explicit replay policy and a builder
    /// that may refuse to produce a request.
    async fn execute_with<T, F>(
        &self,
        context: &str,
        replay: Replay,
        build: F,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<RequestBuilder, ClientError>,
    {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, replay, || {
            let request = build();
            async move {
                let response = request?.send().await?;
                let body = read_success_body(response).await?;
                serde_json::from_str::<T>(&body).map_err(|e| ClientError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

/// Maps the status line to a typed error, returning the body text on 2xx.
async fn read_success_body(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let url = response.url().to_string();
    tracing::debug!(%url, status = status.as_u16(), "backend response");

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ClientError::RateLimited { retry_after_secs });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound { url });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            if let Some(detail) = extract_detail(&body) {
                return Err(ClientError::Rejected {
                    status: status.as_u16(),
                    detail,
                });
            }
        }
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    Ok(response.text().await?)
}

/// Pulls the human-readable reason out of a FastAPI error body.
///
/// `detail` is a string for `HTTPException` and a list of objects with a
/// `msg` field for validation failures.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}

impl LocationSource for BackendClient {
    async fn fetch_locations(&self) -> Result<Vec<Location>, FetchError> {
        self.list_locations().await.map_err(FetchError::from)
    }

    async fn fetch_location(&self, id: &LocationId) -> Result<Location, FetchError> {
        match self.get_location(id).await {
            Ok(location) => Ok(location),
            Err(ClientError::NotFound { .. }) => Err(FetchError::NotFound(id.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
