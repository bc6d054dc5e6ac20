//! Spotify catalog client.
//!
//! Exchanges client credentials for an access token and pulls genre-seeded
//! recommendations, mapping them into the domain's
//! [`CandidateTrack`](tuneiq_core::rounds::CandidateTrack) pool.

pub mod client;
pub mod models;

pub use client::{CatalogError, SpotifyCatalog, SpotifyConfig};
