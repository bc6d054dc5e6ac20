//! Wire types for the Spotify Web API responses we consume.

use serde::Deserialize;
use tuneiq_core::rounds::CandidateTrack;

/// Response of the client-credentials token exchange.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Response of `GET /v1/recommendations`.
#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

/// The subset of a Spotify track object the game needs.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    /// 30-second MP3 clip; often `null` for licensing reasons.
    #[serde(default)]
    pub preview_url: Option<String>,
}

impl From<SpotifyTrack> for CandidateTrack {
    fn from(track: SpotifyTrack) -> Self {
        CandidateTrack {
            id: track.id,
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            preview_url: track.preview_url.filter(|url| !url.is_empty()),
        }
    }
}
