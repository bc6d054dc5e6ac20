//! REST client for the Spotify accounts and Web API endpoints.
//!
//! Uses the client-credentials flow: every pool fetch exchanges the
//! configured credentials for a fresh bearer token, then requests
//! recommendations seeded by genre. Nothing is retried.

use async_trait::async_trait;
use tuneiq_core::catalog::TrackCatalog;
use tuneiq_core::error::CoreError;
use tuneiq_core::rounds::CandidateTrack;

use crate::models::{RecommendationsResponse, SpotifyTrack, TokenResponse};

/// Largest `limit` the recommendations endpoint accepts.
pub const MAX_RECOMMENDATION_LIMIT: usize = 100;

/// Default popularity floor for recommended tracks (0-100).
pub const DEFAULT_MIN_POPULARITY: u8 = 50;

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Connection settings for the Spotify client.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Only recommend tracks at least this popular.
    pub min_popularity: u8,
    /// Base URL of the accounts service (token exchange).
    pub accounts_url: String,
    /// Base URL of the Web API.
    pub api_url: String,
}

impl SpotifyConfig {
    /// Config pointing at the public Spotify endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            min_popularity: DEFAULT_MIN_POPULARITY,
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Errors from the Spotify REST layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Spotify returned a non-2xx status code.
    #[error("Spotify API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        CoreError::Upstream(format!("catalog: {err}"))
    }
}

/// Spotify-backed [`TrackCatalog`].
pub struct SpotifyCatalog {
    client: reqwest::Client,
    config: SpotifyConfig,
}

impl SpotifyCatalog {
    pub fn new(config: SpotifyConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a catalog reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: SpotifyConfig) -> Self {
        Self { client, config }
    }

    /// Exchange the client credentials for a bearer token.
    pub async fn request_token(&self) -> Result<String, CatalogError> {
        let response = self.token_request().send().await?;
        let token: TokenResponse = Self::parse_response(response).await?;
        Ok(token.access_token)
    }

    /// Fetch genre-seeded recommendations.
    ///
    /// `limit` is clamped to `1..=MAX_RECOMMENDATION_LIMIT`.
    pub async fn recommendations(
        &self,
        token: &str,
        genre: &str,
        limit: usize,
    ) -> Result<Vec<SpotifyTrack>, CatalogError> {
        let response = self
            .recommendations_request(token, genre, limit)
            .send()
            .await?;
        let body: RecommendationsResponse = Self::parse_response(response).await?;
        Ok(body.tracks)
    }

    // ---- request builders ----

    fn token_request(&self) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/api/token", self.config.accounts_url))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
    }

    fn recommendations_request(
        &self,
        token: &str,
        genre: &str,
        limit: usize,
    ) -> reqwest::RequestBuilder {
        let limit = limit.clamp(1, MAX_RECOMMENDATION_LIMIT);
        self.client
            .get(format!("{}/v1/recommendations", self.config.api_url))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("limit", limit.to_string()),
                ("seed_genres", genre.to_string()),
                ("min_popularity", self.config.min_popularity.to_string()),
            ])
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or a
    /// [`CatalogError::Api`] carrying status and body otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TrackCatalog for SpotifyCatalog {
    async fn fetch_candidate_tracks(
        &self,
        genre: &str,
        limit: usize,
    ) -> Result<Vec<CandidateTrack>, CoreError> {
        let token = self.request_token().await?;
        let tracks = self.recommendations(&token, genre, limit).await?;

        tracing::debug!(genre, limit, fetched = tracks.len(), "Fetched track pool");

        Ok(tracks.into_iter().map(CandidateTrack::from).collect())
    }
}
