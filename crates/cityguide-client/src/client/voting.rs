//! Rating and health endpoints.

use cityguide_core::LocationId;

use crate::client::BackendClient;
use crate::error::ClientError;
use crate::retry::Replay;
use crate::types::{HealthStatus, RatingReceipt, VotingStats};

const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

impl BackendClient {
    /// Submits a 1..=5 star rating via `POST /voting/{id}/rate?rating=N`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidRating`] for a value outside 1..=5; nothing
    ///   is sent.
    /// - [`ClientError::Rejected`] if the backend refuses the vote.
    /// - [`ClientError::Http`] on network failure.
    pub async fn rate_location(
        &self,
        id: &LocationId,
        rating: u8,
    ) -> Result<RatingReceipt, ClientError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ClientError::InvalidRating(rating));
        }
        let mut url = self.endpoint(&["voting", id.as_str(), "rate"]);
        url.query_pairs_mut()
            .append_pair("rating", &rating.to_string());
        // Each anonymous vote counts, so a replay could be a second vote.
        self.execute_with(&format!("rating for {id}"), Replay::NonIdempotent, || {
            Ok(self.client.post(url.clone()))
        })
        .await
    }

    /// Fetches aggregate votes via `GET /voting/{id}/stats`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body has an unexpected shape.
    pub async fn voting_stats(&self, id: &LocationId) -> Result<VotingStats, ClientError> {
        let url = self.endpoint(&["voting", id.as_str(), "stats"]);
        self.execute(&format!("voting stats for {id}"), || {
            self.client.get(url.clone())
        })
        .await
    }

    /// Checks `GET /health`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] if the backend is unreachable.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint(&["health"]);
        self.execute("health check", || self.client.get(url.clone()))
            .await
    }
}
